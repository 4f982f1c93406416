//! In-process notes collection.
//!
//! Behaves like a hosted collection seen from several clients at once: every
//! insert or delete is pushed to all open subscriptions, including the one
//! belonging to the client that made the change.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use uuid::Uuid;

use super::{ChangeEvent, NoteCollection, RemoteError, RemoteResult, Subscription};
use crate::models::{Note, NoteDraft, NoteId};

#[derive(Debug, Default)]
struct CollectionState {
    notes: Vec<Note>,
    subscribers: Vec<mpsc::UnboundedSender<ChangeEvent>>,
    outage: Option<String>,
}

impl CollectionState {
    fn ensure_available(&self) -> RemoteResult<()> {
        match &self.outage {
            Some(reason) => Err(RemoteError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn publish(&mut self, event: &ChangeEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Shared, cloneable in-memory collection
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollection {
    state: Arc<Mutex<CollectionState>>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collection with existing notes (no events are published)
    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let collection = Self::new();
        if let Ok(mut state) = collection.state.lock() {
            state.notes.extend(notes);
        }
        collection
    }

    /// Snapshot of the stored notes in store order
    pub fn notes(&self) -> Vec<Note> {
        self.lock().map(|state| state.notes.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map_or(0, |state| state.notes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every call fail with [`RemoteError::Unavailable`] until cleared
    pub fn set_outage(&self, reason: Option<&str>) {
        if let Ok(mut state) = self.lock() {
            state.outage = reason.map(str::to_string);
        }
    }

    /// Number of subscriptions still listening
    pub fn subscriber_count(&self) -> usize {
        self.lock().map_or(0, |state| {
            state
                .subscribers
                .iter()
                .filter(|subscriber| !subscriber.is_closed())
                .count()
        })
    }

    fn lock(&self) -> RemoteResult<MutexGuard<'_, CollectionState>> {
        self.state
            .lock()
            .map_err(|_| RemoteError::Unavailable("collection state lock poisoned".to_string()))
    }
}

impl NoteCollection for InMemoryCollection {
    async fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        let state = self.lock()?;
        state.ensure_available()?;
        Ok(state.notes.clone())
    }

    async fn insert(&self, draft: &NoteDraft) -> RemoteResult<NoteId> {
        let mut state = self.lock()?;
        state.ensure_available()?;

        let note = Note::from_draft(NoteId::new(Uuid::now_v7().to_string()), draft.clone());
        let id = note.id.clone();
        state.notes.push(note.clone());
        state.publish(&ChangeEvent::inserted(note));
        Ok(id)
    }

    async fn delete(&self, id: &NoteId) -> RemoteResult<()> {
        let mut state = self.lock()?;
        state.ensure_available()?;

        if let Some(position) = state.notes.iter().position(|note| &note.id == id) {
            let removed = state.notes.remove(position);
            state.publish(&ChangeEvent::deleted(removed));
        }
        Ok(())
    }

    async fn subscribe(&self) -> RemoteResult<Subscription> {
        let mut state = self.lock()?;
        state.ensure_available()?;

        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.push(tx);
        Ok(Subscription::new(rx))
    }
}
