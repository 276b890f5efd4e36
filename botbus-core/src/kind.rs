//! Message content kinds.

use std::fmt;

/// The content kind of a chat message, as reported by the host.
///
/// Unknown codes and names map to [`MessageKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
    /// Plain text (code `1`).
    #[default]
    Text,
    /// Structured card (code `2`).
    Card,
    /// Mixed image and text (code `3`).
    ImageText,
    /// Voice clip (code `4`).
    Voice,
    /// File transfer (code `5`).
    File,
    /// Reply to another message (code `6`).
    Reply,
    /// Anything the host reports that is not listed above (code `0`).
    Unknown,
}

impl MessageKind {
    /// All kinds.
    pub const ALL: [MessageKind; 7] = [
        MessageKind::Text,
        MessageKind::Card,
        MessageKind::ImageText,
        MessageKind::Voice,
        MessageKind::File,
        MessageKind::Reply,
        MessageKind::Unknown,
    ];

    /// The host's integer code for this kind.
    pub const fn code(self) -> i32 {
        match self {
            MessageKind::Text => 1,
            MessageKind::Card => 2,
            MessageKind::ImageText => 3,
            MessageKind::Voice => 4,
            MessageKind::File => 5,
            MessageKind::Reply => 6,
            MessageKind::Unknown => 0,
        }
    }

    /// The lowercase name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Card => "card",
            MessageKind::ImageText => "image_text",
            MessageKind::Voice => "voice",
            MessageKind::File => "file",
            MessageKind::Reply => "reply",
            MessageKind::Unknown => "unknown",
        }
    }

    /// Looks up a kind by the host's integer code.
    pub fn from_code(code: i32) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.code() == code)
            .unwrap_or(MessageKind::Unknown)
    }

    /// Looks up a kind by name.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .unwrap_or(MessageKind::Unknown)
    }
}

impl From<i32> for MessageKind {
    fn from(code: i32) -> Self {
        MessageKind::from_code(code)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code_and_name() {
        assert_eq!(MessageKind::from_code(3), MessageKind::ImageText);
        assert_eq!(MessageKind::from_name("reply"), MessageKind::Reply);
        assert_eq!(MessageKind::from_code(0), MessageKind::Unknown);
    }

    #[test]
    fn unrecognized_maps_to_unknown() {
        assert_eq!(MessageKind::from_code(99), MessageKind::Unknown);
        assert_eq!(MessageKind::from_name("sticker"), MessageKind::Unknown);
    }
}
