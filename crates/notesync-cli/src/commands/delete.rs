use std::io::Write;

use notesync_core::render::ConfirmPrompt;
use notesync_core::{NoteCollection, NoteListSynchronizer, RemoveOutcome};

use crate::commands::common::normalize_note_identifier;
use crate::error::CliError;
use crate::terminal::Silent;

pub async fn run_delete<C, P, W>(
    collection: C,
    id: &str,
    prompt: P,
    out: &mut W,
) -> Result<(), CliError>
where
    C: NoteCollection,
    P: ConfirmPrompt,
    W: Write,
{
    let id = normalize_note_identifier(id)?;
    let mut sync = NoteListSynchronizer::new(collection, Silent, prompt);
    sync.load().await?;

    match sync.remove(&id).await? {
        RemoveOutcome::Removed => writeln!(out, "{id}")?,
        RemoveOutcome::Declined => writeln!(out, "Kept {id}")?,
    }
    Ok(())
}
