//! Channel identifiers.

use std::fmt;

/// One category of host event, with its own handler registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Incoming chat messages. Priority ordered.
    Message,
    /// A member was muted or otherwise restricted.
    ForbiddenAction,
    /// A member joined or left a group.
    MembershipChange,
    /// The host's floating window was clicked.
    FloatingWindowClick,
    /// Outgoing message text, rewritten by a chain of handlers.
    OutboundTransform,
    /// A message's context menu is being built.
    MenuBuild,
    /// Raw protocol message, before the host parses it.
    RawMessage,
    /// The host finished loading scripts.
    Load,
    /// The host is about to unload scripts.
    Unload,
}

impl Channel {
    /// Every channel, in a fixed order.
    pub const ALL: [Channel; 9] = [
        Channel::Message,
        Channel::ForbiddenAction,
        Channel::MembershipChange,
        Channel::FloatingWindowClick,
        Channel::OutboundTransform,
        Channel::MenuBuild,
        Channel::RawMessage,
        Channel::Load,
        Channel::Unload,
    ];

    /// A stable snake_case name, used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Message => "message",
            Channel::ForbiddenAction => "forbidden_action",
            Channel::MembershipChange => "membership_change",
            Channel::FloatingWindowClick => "floating_window_click",
            Channel::OutboundTransform => "outbound_transform",
            Channel::MenuBuild => "menu_build",
            Channel::RawMessage => "raw_message",
            Channel::Load => "load",
            Channel::Unload => "unload",
        }
    }

    /// Whether handlers on this channel are ordered by [`Priority`](crate::Priority).
    pub const fn is_prioritized(self) -> bool {
        matches!(self, Channel::Message)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_message_channel_is_prioritized() {
        let prioritized: Vec<Channel> = Channel::ALL
            .into_iter()
            .filter(|c| c.is_prioritized())
            .collect();
        assert_eq!(prioritized, vec![Channel::Message]);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = Channel::ALL.into_iter().map(Channel::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Channel::ALL.len());
        assert_eq!(Channel::FloatingWindowClick.to_string(), "floating_window_click");
    }
}
