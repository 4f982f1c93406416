use std::io::Write;

use notesync_core::{NoteCollection, NoteListSynchronizer};

use crate::error::CliError;
use crate::terminal::{AlwaysConfirm, Silent};

pub async fn run_add<C, W>(collection: C, text: &str, out: &mut W) -> Result<(), CliError>
where
    C: NoteCollection,
    W: Write,
{
    let mut sync = NoteListSynchronizer::new(collection, Silent, AlwaysConfirm);
    sync.load().await?;
    let note = sync.create(text).await?;

    writeln!(out, "{}", note.id)?;
    Ok(())
}
