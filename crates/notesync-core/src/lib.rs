//! notesync-core - Core library for notesync
//!
//! This crate keeps a local, ordered list of short notes in step with a hosted
//! notes collection. It contains the note models, the remote collection
//! clients, the HTML projection, and the [`NoteListSynchronizer`] that ties
//! them together.

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod render;
pub mod sync;
pub mod util;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId};
pub use remote::{ChangeEvent, NoteCollection, RemoteError, Subscription};
pub use render::{ConfirmPrompt, HtmlRenderer, NoteRenderer};
pub use sync::{Composer, EventOutcome, NoteListSynchronizer, RemoveOutcome, SubmitStatus};
