//! Note model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the remote store when a note is inserted.
///
/// The value is opaque: clients never generate or parse it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap a store-assigned identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A note as stored in the remote collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier
    pub id: NoteId,
    /// Creation time chosen by the author, the only sort key
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    /// Untrusted user text
    pub text: String,
}

impl Note {
    /// Finalize a draft with the id the remote store assigned to it
    #[must_use]
    pub fn from_draft(id: NoteId, draft: NoteDraft) -> Self {
        Self {
            id,
            timestamp: draft.timestamp,
            text: draft.text,
        }
    }

    /// Get first line as title preview, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.text
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }
}

/// A note that has not been inserted yet, so it has no id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl NoteDraft {
    /// Create a draft stamped with the current time
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(Utc::now(), text)
    }

    #[must_use]
    pub fn at(timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}
