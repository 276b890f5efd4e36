//! Bus configuration.

use crate::bus::EventBus;
use botbus_std::dispatch::{Dispatcher, FaultObserver};
use std::sync::Arc;

/// Builder for an [`EventBus`].
///
/// # Example
/// ```ignore
/// let faults = FaultCollector::new();
/// let bus = EventBus::builder()
///     .named("qq")
///     .on_fault(faults.clone())
///     .build();
/// ```
#[derive(Default)]
pub struct BusBuilder {
    name: Option<&'static str>,
    observer: Option<Arc<dyn FaultObserver>>,
}

impl BusBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the bus. The name is attached to every log line it emits.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Receive a report for every handler fault, after it has been logged.
    pub fn on_fault<O: FaultObserver>(mut self, observer: O) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Build the bus. Its registries are created on first use.
    pub fn build(self) -> EventBus {
        let mut dispatcher = Dispatcher::new();
        if let Some(name) = self.name {
            dispatcher = dispatcher.named(name);
        }
        if let Some(observer) = self.observer {
            dispatcher = dispatcher.with_observer(observer);
        }
        EventBus::from_dispatcher(dispatcher)
    }
}
