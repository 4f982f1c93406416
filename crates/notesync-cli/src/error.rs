use std::io;

use notesync_core::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notesync_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note text provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<RemoteError> for CliError {
    fn from(error: RemoteError) -> Self {
        Self::Core(error.into())
    }
}
