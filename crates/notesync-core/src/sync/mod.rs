//! Local note list kept in step with a remote collection.
//!
//! [`NoteListSynchronizer`] owns the ordered, deduplicated view of the notes.
//! Three sources change it: the initial [`load`](NoteListSynchronizer::load),
//! local mutations ([`create`](NoteListSynchronizer::create),
//! [`remove`](NoteListSynchronizer::remove)) and change events pushed by the
//! remote collection ([`apply_remote_event`](NoteListSynchronizer::apply_remote_event)).
//! Every change is mirrored to the renderer; the renderer is never consulted.

mod composer;

use std::collections::HashSet;

pub use composer::{Composer, SubmitStatus};

use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId};
use crate::remote::{ChangeEvent, NoteCollection, Subscription};
use crate::render::{ConfirmPrompt, NoteRenderer};

/// Question asked before a note is deleted
pub const DELETE_CONFIRMATION: &str = "Delete note forever?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

/// What [`NoteListSynchronizer::apply_remote_event`] did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Inserted,
    /// Insert for an id already in the view
    Duplicate,
    Removed,
    /// Delete for an id not in the view
    Absent,
    /// Update, empty event, or event before the first load
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Declined,
}

pub struct NoteListSynchronizer<C, R, P> {
    collection: C,
    renderer: R,
    prompt: P,
    notes: Vec<Note>,
    ids: HashSet<NoteId>,
    state: LoadState,
}

impl<C, R, P> NoteListSynchronizer<C, R, P>
where
    C: NoteCollection,
    R: NoteRenderer,
    P: ConfirmPrompt,
{
    pub fn new(collection: C, renderer: R, prompt: P) -> Self {
        Self {
            collection,
            renderer,
            prompt,
            notes: Vec::new(),
            ids: HashSet::new(),
            state: LoadState::NotLoaded,
        }
    }

    /// Replace the view with the full remote collection, newest first.
    ///
    /// On failure the previous view is kept and nothing is rendered.
    pub async fn load(&mut self) -> Result<usize> {
        let fetched = match self.collection.fetch_all().await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::error!("Failed to load notes: {}", error);
                return Err(error.into());
            }
        };

        let mut ids = HashSet::with_capacity(fetched.len());
        let mut notes = fetched
            .into_iter()
            .filter(|note| ids.insert(note.id.clone()))
            .collect::<Vec<_>>();
        notes.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

        self.notes = notes;
        self.ids = ids;
        self.state = LoadState::Loaded;
        self.renderer.render(&self.notes);

        tracing::debug!("Loaded {} notes", self.notes.len());
        Ok(self.notes.len())
    }

    /// Insert a new note stamped with the current time.
    ///
    /// The view only changes once the remote store has accepted the note and
    /// assigned its id.
    pub async fn create(&mut self, text: &str) -> Result<Note> {
        self.ensure_loaded()?;
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        let draft = NoteDraft::new(text);
        let id = match self.collection.insert(&draft).await {
            Ok(id) => id,
            Err(error) => {
                tracing::error!("Failed to create note: {}", error);
                return Err(error.into());
            }
        };

        let note = Note::from_draft(id, draft);
        if !self.insert_local(note.clone()) {
            tracing::debug!("Note {} already arrived through the subscription", note.id);
        }
        Ok(note)
    }

    /// Submit the composer's text, clearing it once the note exists.
    pub async fn submit(&mut self, composer: &mut Composer) -> Result<Note> {
        if composer.is_submitting() {
            return Err(Error::SubmitInFlight);
        }

        composer.begin_submit();
        let text = composer.text().to_string();
        match self.create(&text).await {
            Ok(note) => {
                composer.finish_submit();
                Ok(note)
            }
            Err(error) => {
                composer.abort_submit();
                Err(error)
            }
        }
    }

    /// Delete a note after the user confirms it.
    pub async fn remove(&mut self, id: &NoteId) -> Result<RemoveOutcome> {
        self.ensure_loaded()?;
        if !self.ids.contains(id) {
            return Err(Error::NoteNotFound(id.to_string()));
        }

        if !self.prompt.confirm(DELETE_CONFIRMATION) {
            return Ok(RemoveOutcome::Declined);
        }

        if let Err(error) = self.collection.delete(id).await {
            tracing::error!("Failed to delete note {}: {}", id, error);
            return Err(error.into());
        }

        self.remove_local(id);
        Ok(RemoveOutcome::Removed)
    }

    /// Apply a change pushed by the remote collection.
    pub fn apply_remote_event(&mut self, event: ChangeEvent) -> EventOutcome {
        if self.state == LoadState::NotLoaded {
            tracing::debug!("Ignoring remote event received before the first load");
            return EventOutcome::Ignored;
        }

        match (event.new, event.old) {
            (Some(note), None) => {
                tracing::info!("Received new note {}", note.id);
                if self.insert_local(note) {
                    EventOutcome::Inserted
                } else {
                    EventOutcome::Duplicate
                }
            }
            (None, Some(note)) => {
                tracing::info!("Received deleted note {}", note.id);
                if self.remove_local(&note.id) {
                    EventOutcome::Removed
                } else {
                    EventOutcome::Absent
                }
            }
            (Some(note), Some(_)) => {
                tracing::debug!("Ignoring update for note {}", note.id);
                EventOutcome::Ignored
            }
            (None, None) => EventOutcome::Ignored,
        }
    }

    /// Open the remote change subscription.
    pub async fn subscribe(&self) -> Result<Subscription> {
        self.collection.subscribe().await.map_err(|error| {
            tracing::error!("Failed to subscribe to note changes: {}", error);
            error.into()
        })
    }

    /// Subscribe, then load.
    ///
    /// Opening the subscription first means a change that lands while the
    /// list is being fetched still reaches the view: events already covered
    /// by the load come back as `Duplicate` or `Absent`.
    pub async fn load_and_subscribe(&mut self) -> Result<Subscription> {
        let subscription = self.subscribe().await?;
        self.load().await?;
        Ok(subscription)
    }

    /// The local view, newest first
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub const fn state(&self) -> LoadState {
        self.state
    }

    pub const fn collection(&self) -> &C {
        &self.collection
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn ensure_loaded(&self) -> Result<()> {
        match self.state {
            LoadState::Loaded => Ok(()),
            LoadState::NotLoaded => Err(Error::NotLoaded),
        }
    }

    // Ties go after notes with the same timestamp.
    fn insert_local(&mut self, note: Note) -> bool {
        if !self.ids.insert(note.id.clone()) {
            return false;
        }

        let index = self
            .notes
            .partition_point(|existing| existing.timestamp >= note.timestamp);
        self.notes.insert(index, note);
        self.renderer
            .render_insert(index, &self.notes[index], &self.notes);
        true
    }

    fn remove_local(&mut self, id: &NoteId) -> bool {
        if !self.ids.remove(id) {
            return false;
        }

        self.notes.retain(|note| &note.id != id);
        self.renderer.render_remove(id, &self.notes);
        true
    }
}
