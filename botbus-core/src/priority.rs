//! Message handler priority.

use std::fmt;

/// Execution priority of a message handler.
///
/// Message handlers run in descending priority order. Handlers with equal
/// priority run in registration order.
///
/// Priorities can be built from their integer code or their symbolic name.
/// Unrecognized input never fails; it maps to [`Priority::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Runs after everything else (code `0`).
    Low,
    /// The default (code `1`).
    #[default]
    Normal,
    /// Runs before everything else (code `2`).
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Normal, Priority::High];

    /// The integer code of this priority.
    pub const fn code(self) -> i32 {
        match self {
            Priority::Low => 0,
            Priority::Normal => 1,
            Priority::High => 2,
        }
    }

    /// The symbolic name of this priority.
    pub const fn name(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }

    /// Looks up a priority by integer code, falling back to `Normal`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Priority::Low,
            2 => Priority::High,
            _ => Priority::Normal,
        }
    }

    /// Looks up a priority by symbolic name, falling back to `Normal`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap_or_default()
    }
}

impl From<i32> for Priority {
    fn from(code: i32) -> Self {
        Priority::from_code(code)
    }
}

impl From<&str> for Priority {
    fn from(name: &str) -> Self {
        Priority::from_name(name)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
