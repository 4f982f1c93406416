use std::io::Write;

use chrono::Utc;
use notesync_core::{NoteCollection, NoteListSynchronizer};

use crate::commands::common::{note_to_list_item, NoteListItem};
use crate::error::CliError;
use crate::terminal::{AlwaysConfirm, Silent, TerminalRenderer};

pub async fn run_list<C, W>(
    collection: C,
    limit: usize,
    as_json: bool,
    out: &mut W,
) -> Result<(), CliError>
where
    C: NoteCollection,
    W: Write,
{
    if as_json {
        let mut sync = NoteListSynchronizer::new(collection, Silent, AlwaysConfirm);
        sync.load().await?;

        let now = Utc::now();
        let json_items = sync
            .notes()
            .iter()
            .take(limit)
            .map(|note| note_to_list_item(note, now))
            .collect::<Vec<NoteListItem>>();
        writeln!(out, "{}", serde_json::to_string_pretty(&json_items)?)?;
    } else {
        let renderer = TerminalRenderer::new(out).with_limit(limit);
        let mut sync = NoteListSynchronizer::new(collection, renderer, AlwaysConfirm);
        sync.load().await?;
    }

    Ok(())
}
