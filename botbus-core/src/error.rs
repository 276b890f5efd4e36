//! Error types for botbus.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`HandlerFault`] - A handler returned an error or panicked
//! - [`ModuleError`] - Errors from loading or unloading script modules

use thiserror::Error;

/// A boxed error type for dynamic error handling.
///
/// This is what a handler returns to signal failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A handler callback failed during dispatch.
///
/// Faults are always recovered by the dispatcher: they are reported and the
/// next handler runs. They never reach the caller of a dispatch.
#[derive(Error, Debug)]
pub enum HandlerFault {
    /// The handler returned an error.
    #[error("{0}")]
    Error(#[source] BoxError),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl HandlerFault {
    /// Returns `true` if the fault came from a panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerFault::Panic(_))
    }
}

/// Errors from the script module lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// A module with this name is already loaded.
    #[error("module already loaded: {0}")]
    AlreadyLoaded(String),

    /// No module with this name is loaded.
    #[error("module not loaded: {0}")]
    NotLoaded(String),

    /// The module panicked while registering its handlers; it was detached
    /// again and is not loaded.
    #[error("module {module} failed to attach: {reason}")]
    AttachFailed {
        /// Name of the module.
        module: String,
        /// The panic message.
        reason: String,
    },
}

impl From<BoxError> for HandlerFault {
    fn from(err: BoxError) -> Self {
        HandlerFault::Error(err)
    }
}
