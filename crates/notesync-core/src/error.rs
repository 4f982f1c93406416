//! Error types for notesync-core

use thiserror::Error;

use crate::remote::RemoteError;

/// Result type alias using notesync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notesync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote collection failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A mutation was requested before the first successful load
    #[error("Note list has not been loaded yet")]
    NotLoaded,

    /// Note not present in the local view
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Empty or whitespace-only note text
    #[error("Note text cannot be empty")]
    EmptyText,

    /// A submission is already waiting on the remote store
    #[error("A note is already being created")]
    SubmitInFlight,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
