//! Data models for notesync

mod note;

pub use note::{Note, NoteDraft, NoteId};
