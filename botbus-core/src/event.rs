//! Event payloads, one per observing channel.
//!
//! These carry what the host reports about an event. The bus never inspects
//! them; they exist so handlers get typed fields instead of an opaque object.

use crate::{kind::MessageKind, payload::Payload};

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Account id of the sender.
    pub sender_id: String,
    /// Group id, or `None` for a private message.
    pub group_id: Option<String>,
    /// Message text.
    pub content: String,
    /// Content kind.
    pub kind: MessageKind,
    /// Host timestamp, in milliseconds.
    pub timestamp: i64,
}

impl MessageEvent {
    /// A private text message.
    pub fn private(sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            group_id: None,
            content: content.into(),
            kind: MessageKind::Text,
            timestamp: 0,
        }
    }

    /// A group text message.
    pub fn group(
        group_id: impl Into<String>,
        sender_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..Self::private(sender_id, content)
        }
    }

    /// Set the content kind.
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the timestamp.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the message was sent in a group.
    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }

    /// Where a reply should go: the group for group messages, else the sender.
    pub fn reply_target(&self) -> &str {
        self.group_id.as_deref().unwrap_or(&self.sender_id)
    }
}

/// A member was muted (or otherwise restricted) by an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenAction {
    /// Group the action happened in.
    pub group_id: String,
    /// The restricted member.
    pub user_id: String,
    /// The member who performed the action.
    pub operator_id: String,
    /// Host timestamp (duration or time of the action, as the host reports it).
    pub timestamp: i64,
}

/// A member joined or left a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    /// Group whose membership changed.
    pub group_id: String,
    /// The member concerned.
    pub user_id: String,
    /// Host-defined change code.
    pub change_type: i32,
}

/// The host's floating window was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClick {
    /// Host-defined click code.
    pub click_type: i32,
    /// Account id of the current chat.
    pub user_id: String,
}

/// A context menu is being built for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBuild {
    /// The message the menu belongs to.
    pub message: MessageEvent,
}

/// A protocol message before the host parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Raw body as delivered by the host.
    pub body: String,
    /// Host timestamp, in milliseconds.
    pub received_at: i64,
}

/// The host finished loading its scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Load;

/// The host is unloading its scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unload;

impl Payload for MessageEvent {}
impl Payload for ForbiddenAction {}
impl Payload for MembershipChange {}
impl Payload for WindowClick {}
impl Payload for MenuBuild {}
impl Payload for RawMessage {}
impl Payload for Load {}
impl Payload for Unload {}
