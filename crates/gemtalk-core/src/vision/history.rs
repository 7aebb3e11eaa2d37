//! Cumulative Q&A display buffer.
//!
//! The buffer is one flat string, newest entry first. Once an entry is
//! merged in it cannot be recovered on its own.

use gemtalk_types::vision::QaEntry;

/// Width of the dashed divider between entries.
pub const DIVIDER_WIDTH: usize = 100;

/// Divider line plus the blank line that follows it.
pub fn separator() -> String {
    format!("{}\n\n", "-".repeat(DIVIDER_WIDTH))
}

/// Session-scoped history buffer shown under the answer box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaHistory {
    buffer: String,
}

impl QaHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `entry` and return the updated history.
    pub fn record(self, entry: &QaEntry) -> Self {
        Self {
            buffer: format!("{}\n\n{}{}", entry.render(), separator(), self.buffer),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
