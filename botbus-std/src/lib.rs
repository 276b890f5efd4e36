//! # botbus-std
//!
//! Standard implementations for the botbus plugin event bus.
//!
//! This crate provides:
//! - **Registries**: [`Registry`](registry::Registry), deduplicated and
//!   optionally priority ordered
//! - **Dispatch**: [`Dispatcher`](dispatch::Dispatcher), with per-handler
//!   fault isolation and transform chaining
//! - **Standard handlers**: kind filtering, logging
//! - **Testing**: probe handlers for asserting on dispatch behavior

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use botbus_core;

// Modules
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod testing;
