//! Session chat history types.

use time::OffsetDateTime;

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of the exchange, retained for the current session only.
///
/// Entries are append-only: the controller never mutates or removes one,
/// and the whole sequence is dropped with the process.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    sender: Sender,
    message: String,
    timestamp: OffsetDateTime,
}

impl HistoryEntry {
    /// Creates an entry for a user query, stamped now.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            message: message.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Creates an entry for an assistant answer, stamped now.
    pub fn assistant(message: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            message: message.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Returns who produced this entry.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the entry was recorded.
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}
