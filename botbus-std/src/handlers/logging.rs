//! Logging Handler - Observability for bus traffic.

use botbus_core::{Handler, HandlerResult, Payload};
use std::fmt::Debug;

/// A handler that logs every event it receives and never fails.
///
/// Events are logged at `debug` level under the handler's name, so a module
/// can trace a channel without writing a handler of its own.
///
/// # Example
///
/// ```rust,ignore
/// bus.register::<MembershipChange>(Arc::new(LoggingHandler::named("membership")));
/// ```
pub struct LoggingHandler {
    name: &'static str,
}

impl LoggingHandler {
    /// Create a new `LoggingHandler` with a default name.
    pub fn new() -> Self {
        Self { name: "event" }
    }

    /// Create a new `LoggingHandler` with a custom name.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LoggingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Handler<E> for LoggingHandler
where
    E: Payload + Debug,
{
    fn handle(&self, event: &E) -> HandlerResult {
        tracing::debug!(name = %self.name, event = ?event, "event received");
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
