//! The dispatch engine.
//!
//! A [`Dispatcher`] runs a snapshot of handlers for one event. Every handler
//! call is isolated: an `Err` return or a panic becomes a [`HandlerFault`],
//! which is reported through `tracing` and the configured [`FaultObserver`],
//! and the next handler runs as if nothing happened.
//!
//! Two shapes of dispatch exist:
//!
//! - [`deliver`](Dispatcher::deliver): every handler observes the same event.
//! - [`transform`](Dispatcher::transform): each handler receives the text
//!   produced by the previous one; `None` and faults leave it unchanged.

use botbus_core::{BoxError, Channel, Handler, HandlerFault, Payload, TransformHandler};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

/// Details of one handler fault.
#[derive(Debug)]
pub struct FaultReport {
    /// Name of the bus that dispatched the event.
    pub bus: &'static str,
    /// The channel being dispatched.
    pub channel: Channel,
    /// The failing handler's name (its type name unless overridden).
    pub handler: &'static str,
    /// What went wrong.
    pub fault: HandlerFault,
}

/// Receives every fault a dispatcher recovers from.
pub trait FaultObserver: Send + Sync + 'static {
    /// Called once per fault, after it has been logged.
    fn on_fault(&self, report: &FaultReport);
}

impl<F> FaultObserver for F
where
    F: Fn(&FaultReport) + Send + Sync + 'static,
{
    fn on_fault(&self, report: &FaultReport) {
        (self)(report)
    }
}

/// Counts from one call to [`Dispatcher::deliver`] or [`Dispatcher::transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Handlers invoked.
    pub invoked: usize,
    /// Handlers that faulted.
    pub faulted: usize,
}

/// Executes handler snapshots with per-handler fault isolation.
#[derive(Clone)]
pub struct Dispatcher {
    name: &'static str,
    observer: Option<Arc<dyn FaultObserver>>,
}

impl Dispatcher {
    /// Create a dispatcher with the default name and no observer.
    pub fn new() -> Self {
        Self {
            name: "botbus",
            observer: None,
        }
    }

    /// Set the name attached to fault logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Set the observer that receives fault reports.
    pub fn with_observer(mut self, observer: Arc<dyn FaultObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The name attached to this dispatcher's logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke every handler in `handlers`, in order, with `event`.
    ///
    /// Never fails: faults are reported and skipped.
    pub fn deliver<E: Payload>(
        &self,
        channel: Channel,
        handlers: &[Arc<dyn Handler<E>>],
        event: &E,
    ) -> Delivery {
        let mut delivery = Delivery::default();
        for handler in handlers {
            delivery.invoked += 1;
            if let Err(fault) = guarded(|| handler.handle(event)) {
                delivery.faulted += 1;
                self.report(channel, handler.name(), fault);
            }
        }
        tracing::trace!(
            bus = self.name,
            %channel,
            invoked = delivery.invoked,
            faulted = delivery.faulted,
            "dispatch complete"
        );
        delivery
    }

    /// Thread `text` through every handler in `handlers`, in order.
    ///
    /// Each handler sees the latest accepted text. A handler returning
    /// `None`, an error, or panicking leaves the text as it was.
    pub fn transform(
        &self,
        handlers: &[Arc<dyn TransformHandler>],
        text: String,
        target_id: &str,
        kind: i32,
    ) -> (String, Delivery) {
        let mut result = text;
        let mut delivery = Delivery::default();
        for handler in handlers {
            delivery.invoked += 1;
            match guarded(|| handler.transform(&result, target_id, kind)) {
                Ok(Some(rewritten)) => result = rewritten,
                Ok(None) => {}
                Err(fault) => {
                    delivery.faulted += 1;
                    self.report(Channel::OutboundTransform, handler.name(), fault);
                }
            }
        }
        tracing::trace!(
            bus = self.name,
            channel = %Channel::OutboundTransform,
            invoked = delivery.invoked,
            faulted = delivery.faulted,
            "transform complete"
        );
        (result, delivery)
    }

    fn report(&self, channel: Channel, handler: &'static str, fault: HandlerFault) {
        tracing::warn!(
            bus = self.name,
            %channel,
            handler,
            error = %fault,
            "handler failed"
        );

        let Some(observer) = &self.observer else {
            return;
        };
        let report = FaultReport {
            bus: self.name,
            channel,
            handler,
            fault,
        };
        if panic::catch_unwind(AssertUnwindSafe(|| observer.on_fault(&report))).is_err() {
            tracing::error!(bus = self.name, %channel, handler, "fault observer panicked");
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

/// Run one handler call, turning errors and panics into a [`HandlerFault`].
fn guarded<T>(call: impl FnOnce() -> Result<T, BoxError>) -> Result<T, HandlerFault> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.into()),
        Err(payload) => Err(HandlerFault::Panic(panic_message(payload.as_ref()))),
    }
}

/// The text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
