//! # Handler capabilities
//!
//! A handler is a value with one narrow callback for one channel. Script
//! modules implement [`Handler<E>`] for each observing channel they care
//! about, and [`TransformHandler`] for the outbound transform channel.
//!
//! # Usage Patterns
//!
//! 1. **Struct implementation**: `impl Handler<MessageEvent> for EchoModule`
//! 2. **Closure**: `|event: &MessageEvent| -> HandlerResult { ... }`
//! 3. **Generated**: `#[botbus::handler]` on a plain function
//!
//! # Identity
//!
//! Handlers are registered as `Arc`s. Their identity is the address of the
//! shared allocation ([`HandlerId`]), never structural equality: two clones
//! of one `Arc` are the same handler, two separately allocated equal values
//! are different handlers.

use crate::{error::BoxError, payload::Payload};
use std::sync::Arc;

/// What an observing handler returns. `Err` is a handler fault.
pub type HandlerResult = Result<(), BoxError>;

/// What a transform handler returns.
///
/// `Ok(Some(text))` replaces the message, `Ok(None)` leaves it unchanged and
/// `Err` is a handler fault (also leaving it unchanged).
pub type TransformResult = Result<Option<String>, BoxError>;

/// A callback observing events of one payload type.
///
/// Returning `Err` or panicking are both treated as a fault of this handler
/// alone; the dispatcher reports it and moves on to the next handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle events of type `{E}`",
    label = "missing `Handler<{E}>` implementation",
    note = "Handlers must implement the `handle` method for the event type `{E}`."
)]
pub trait Handler<E: Payload>: Send + Sync + 'static {
    /// Reacts to one event.
    fn handle(&self, event: &E) -> HandlerResult;

    /// A name identifying this handler in fault reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// Blanket impl for closures
impl<F, E> Handler<E> for F
where
    E: Payload,
    F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, event: &E) -> HandlerResult {
        (self)(event)
    }
}

/// A stage of the outbound message pipeline.
///
/// Receives the text as rewritten by earlier stages, the target account or
/// group id, and the host's message type code.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `TransformHandler`",
    label = "missing `TransformHandler` implementation",
    note = "Transform handlers must implement `transform(text, target_id, kind)`."
)]
pub trait TransformHandler: Send + Sync + 'static {
    /// Rewrites (or passes through) an outgoing message.
    fn transform(&self, text: &str, target_id: &str, kind: i32) -> TransformResult;

    /// A name identifying this handler in fault reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> TransformHandler for F
where
    F: Fn(&str, &str, i32) -> TransformResult + Send + Sync + 'static,
{
    fn transform(&self, text: &str, target_id: &str, kind: i32) -> TransformResult {
        (self)(text, target_id, kind)
    }
}

/// Identity of a registered handler: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    /// Identity of the handler behind `handler`.
    ///
    /// Works for both concrete and type-erased `Arc`s, so an `Arc<T>` and the
    /// `Arc<dyn Handler<E>>` it was coerced into have the same id.
    pub fn of<H: ?Sized>(handler: &Arc<H>) -> Self {
        HandlerId(Arc::as_ptr(handler).cast::<()>() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Load, MessageEvent};

    struct Greeter;

    impl Handler<MessageEvent> for Greeter {
        fn handle(&self, event: &MessageEvent) -> HandlerResult {
            if event.content.is_empty() {
                return Err("empty message".into());
            }
            Ok(())
        }
    }

    #[test]
    fn struct_handler_reports_type_name() {
        let greeter = Greeter;
        assert!(greeter.name().ends_with("Greeter"));
        assert!(greeter.handle(&MessageEvent::private("1", "hi")).is_ok());
        assert!(greeter.handle(&MessageEvent::private("1", "")).is_err());
    }

    #[test]
    fn closures_are_handlers() {
        let on_load = |_: &Load| -> HandlerResult { Ok(()) };
        assert!(on_load.handle(&Load).is_ok());

        let upper = |text: &str, _: &str, _: i32| -> TransformResult {
            Ok(Some(text.to_uppercase()))
        };
        assert_eq!(upper.transform("hi", "1", 1).unwrap(), Some("HI".to_string()));
    }

    #[test]
    fn identity_survives_type_erasure() {
        let concrete = Arc::new(Greeter);
        let erased: Arc<dyn Handler<MessageEvent>> = concrete.clone();
        assert_eq!(HandlerId::of(&concrete), HandlerId::of(&erased));

        let other = Arc::new(Greeter);
        assert_ne!(HandlerId::of(&concrete), HandlerId::of(&other));
    }
}
