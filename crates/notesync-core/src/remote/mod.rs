//! Remote notes collection contract.
//!
//! The synchronizer only ever talks to the remote store through
//! [`NoteCollection`]. Two implementations ship with the crate: an
//! in-process [`memory::InMemoryCollection`] and a REST client
//! [`http::HttpNoteCollection`].

pub mod http;
pub mod memory;
#[cfg(test)]
pub(crate) mod test_server;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{Note, NoteDraft, NoteId};

/// Failures reported by a remote collection
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Remote API error: {message} ({status})")]
    Api { status: u16, message: String },
    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),
    #[error("Remote collection unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Whether the same call could succeed if issued again later.
    ///
    /// Expired sessions and malformed payloads are terminal; dropped
    /// connections, timeouts and server-side failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(error) => error.is_timeout() || error.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Unavailable(_) => true,
            Self::InvalidConfiguration(_) | Self::Unauthorized(_) | Self::InvalidPayload(_) => {
                false
            }
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// A change pushed by the remote collection.
///
/// At most one of `new` / `old` is expected to be set: `new` alone is an
/// insertion, `old` alone a deletion. Anything else (an update, or an empty
/// event) carries no behavior yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub new: Option<Note>,
    pub old: Option<Note>,
}

impl ChangeEvent {
    #[must_use]
    pub const fn inserted(note: Note) -> Self {
        Self {
            new: Some(note),
            old: None,
        }
    }

    #[must_use]
    pub const fn deleted(note: Note) -> Self {
        Self {
            new: None,
            old: Some(note),
        }
    }
}

/// Stream of [`ChangeEvent`]s for one subscriber.
///
/// Events keep arriving until the producer side goes away. Dropping the
/// subscription stops any background task that feeds it.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub const fn new(events: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self { events, task: None }
    }

    pub const fn with_task(
        events: mpsc::UnboundedReceiver<ChangeEvent>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            events,
            task: Some(task),
        }
    }

    /// Wait for the next event; `None` once the producer has shut down.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.events.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Operations the synchronizer needs from the remote notes collection
#[allow(async_fn_in_trait)]
pub trait NoteCollection {
    /// Fetch every note in the collection, in store order
    async fn fetch_all(&self) -> RemoteResult<Vec<Note>>;

    /// Insert a draft and return the id the store assigned to it
    async fn insert(&self, draft: &NoteDraft) -> RemoteResult<NoteId>;

    /// Delete a note by id
    async fn delete(&self, id: &NoteId) -> RemoteResult<()>;

    /// Open a change subscription for the rest of the session
    async fn subscribe(&self) -> RemoteResult<Subscription>;
}
