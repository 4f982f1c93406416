use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use notesync_core::sync::DELETE_CONFIRMATION;
use notesync_core::{
    Composer, Error, NoteCollection, NoteId, NoteListSynchronizer, RemoveOutcome,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::CliError;
use crate::terminal::{is_affirmative, TerminalRenderer};

/// One line typed while watching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Create(String),
    Delete(NoteId),
    Quit,
    Blank,
}

pub fn parse_watch_input(line: &str) -> WatchInput {
    let line = line.trim();
    if line.is_empty() {
        return WatchInput::Blank;
    }
    if line == "/quit" {
        return WatchInput::Quit;
    }
    if let Some(id) = line.strip_prefix("/delete ") {
        let id = id.trim();
        if !id.is_empty() {
            return WatchInput::Delete(NoteId::new(id));
        }
    }
    WatchInput::Create(line.to_string())
}

/// Subscribe and load, then apply remote changes and typed commands until
/// `/quit`, end of input, or the subscription closing.
///
/// `/delete <id>` asks for confirmation; the next input line is the answer.
pub async fn run_watch<C, I, W>(collection: C, input: I, out: &mut W) -> Result<(), CliError>
where
    C: NoteCollection,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let answer = Rc::new(Cell::new(false));
    let prompt = {
        let answer = Rc::clone(&answer);
        move |_: &str| answer.get()
    };
    let mut sync = NoteListSynchronizer::new(collection, TerminalRenderer::new(out), prompt);
    let mut subscription = sync.load_and_subscribe().await?;
    let mut composer = Composer::new();
    let mut pending_delete: Option<NoteId> = None;
    let mut lines = input.lines();

    tracing::info!("Watching {} notes", sync.len());
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                if let Some(id) = pending_delete.take() {
                    answer.set(is_affirmative(&line));
                    match sync.remove(&id).await {
                        Ok(RemoveOutcome::Removed) => {}
                        Ok(RemoveOutcome::Declined) => {
                            sync.renderer_mut().write_line(&format!("Kept {id}"));
                        }
                        Err(error) => eprintln!("Error: {error}"),
                    }
                    continue;
                }

                match parse_watch_input(&line) {
                    WatchInput::Quit => break,
                    WatchInput::Blank => {}
                    WatchInput::Create(text) => {
                        composer.set_text(text);
                        match sync.submit(&mut composer).await {
                            Ok(_) => {
                                sync.renderer_mut().write_line(composer.status().label());
                                composer.reset_status();
                            }
                            Err(error) => eprintln!("Error: {error}"),
                        }
                    }
                    WatchInput::Delete(id) => {
                        if sync.contains(&id) {
                            sync.renderer_mut()
                                .write_line(&format!("{DELETE_CONFIRMATION} [y/N]"));
                            pending_delete = Some(id);
                        } else {
                            eprintln!("Error: {}", Error::NoteNotFound(id.to_string()));
                        }
                    }
                }
            }
            event = subscription.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Note subscription closed");
                    break;
                };
                let outcome = sync.apply_remote_event(event);
                tracing::debug!("Applied remote event: {:?}", outcome);
            }
        }
    }

    Ok(())
}
