//! # botbus - Event Bus for Chat-Bot Script Modules
//!
//! `botbus` lets independently loaded script modules react to chat-bot events
//! without stepping on each other. The host reports each event once; the bus
//! fans it out to every interested handler.
//!
//! - **Priority**: message handlers run highest priority first, and in
//!   registration order among equals.
//! - **Deduplication**: registering the same handler twice is a no-op.
//! - **Snapshots**: a handler that registers or unregisters during a
//!   dispatch only affects the next dispatch.
//! - **Fault isolation**: a handler that errors or panics is logged and
//!   skipped; the remaining handlers still run.
//! - **Transforms**: outgoing text is threaded through a chain of handlers,
//!   each of which may rewrite it or leave it alone.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use botbus::prelude::*;
//! use std::sync::Arc;
//!
//! struct Hello;
//!
//! impl Handler<MessageEvent> for Hello {
//!     fn handle(&self, event: &MessageEvent) -> HandlerResult {
//!         if event.content.trim() == "text" {
//!             send(event.reply_target(), "hello world")?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let bus = EventBus::new();
//! bus.register_message_with_priority(Arc::new(Hello), Priority::High);
//! bus.dispatch_message(&MessageEvent::group("777", "10001", "text"));
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod builder;
mod bus;
mod module;

pub use botbus_core::{
    BoxError, Channel, ForbiddenAction, Handler, HandlerFault, HandlerId, HandlerResult, Load,
    MembershipChange, MenuBuild, MessageEvent, MessageKind, ModuleError, Payload, Priority,
    RawMessage, TransformHandler, TransformResult, Unload, WindowClick,
};
pub use builder::BusBuilder;
pub use bus::{BusEvent, EventBus, HandlerRegistry, TransformRegistry};
#[cfg(feature = "inventory")]
pub use module::ModuleRegistration;
pub use module::{ModuleHost, ScriptModule};

/// Dispatch engine and fault reporting.
pub mod dispatch {
    pub use botbus_std::dispatch::{
        Delivery, Dispatcher, FaultObserver, FaultReport, panic_message,
    };
}

/// Handler registries.
pub mod registry {
    pub use botbus_std::registry::{Ordering, Registry};
}

/// Standard handler implementations.
pub mod handlers {
    pub use botbus_std::handlers::{KindFilter, LoggingHandler};
}

/// Testing utilities.
pub mod testing {
    pub use botbus_std::testing::{
        CollectedFault, CountingHandler, FailingHandler, FaultCollector, FixedTransform,
        OrderProbe, PanickingHandler, ProbeHandler, RecordingHandler,
    };
}

/// Prelude module - common imports for script modules.
///
/// # Usage
///
/// ```rust,ignore
/// use botbus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Channel, EventBus, ForbiddenAction, Handler, HandlerResult, Load,
        MembershipChange, MenuBuild, MessageEvent, MessageKind, Priority, RawMessage,
        ScriptModule, TransformHandler, TransformResult, Unload, WindowClick,
    };
}

#[cfg(feature = "macros")]
pub use botbus_macros::{Payload, handler};

#[cfg(feature = "inventory")]
pub use inventory;
