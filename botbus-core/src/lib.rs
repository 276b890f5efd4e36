//! # botbus-core
//!
//! Core vocabulary for the botbus plugin event bus.
//!
//! This crate has minimal dependencies and is what script modules import to
//! declare handlers. The registries, the dispatch engine and the bus facade
//! live in `botbus-std` and `botbus`.
//!
//! # Channels
//!
//! Every event the chat-bot host reports belongs to exactly one [`Channel`].
//! Each channel has a payload type and a fixed callback capability:
//!
//! | channel                 | payload                 | capability                  |
//! |-------------------------|-------------------------|-----------------------------|
//! | Message                 | [`MessageEvent`]        | [`Handler<MessageEvent>`]   |
//! | ForbiddenAction         | [`ForbiddenAction`]     | [`Handler<ForbiddenAction>`]|
//! | MembershipChange        | [`MembershipChange`]    | [`Handler<MembershipChange>`]|
//! | FloatingWindowClick     | [`WindowClick`]         | [`Handler<WindowClick>`]    |
//! | OutboundTransform       | text, target, kind      | [`TransformHandler`]        |
//! | MenuBuild               | [`MenuBuild`]           | [`Handler<MenuBuild>`]      |
//! | RawMessage              | [`RawMessage`]          | [`Handler<RawMessage>`]     |
//! | Load                    | [`Load`]                | [`Handler<Load>`]           |
//! | Unload                  | [`Unload`]              | [`Handler<Unload>`]         |
//!
//! Only the Message channel carries a [`Priority`]; only the OutboundTransform
//! channel produces a value.
//!
//! # Error Types
//!
//! - [`HandlerFault`] - A handler failed during dispatch
//! - [`ModuleError`] - Script module lifecycle errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod channel;
mod error;
mod event;
mod handler;
mod kind;
mod payload;
mod priority;

// Re-exports
pub use channel::Channel;
pub use error::{BoxError, HandlerFault, ModuleError};
pub use event::{
    ForbiddenAction, Load, MembershipChange, MenuBuild, MessageEvent, RawMessage, Unload,
    WindowClick,
};
pub use handler::{Handler, HandlerId, HandlerResult, TransformHandler, TransformResult};
pub use kind::MessageKind;
pub use payload::Payload;
pub use priority::Priority;
