//! Terminal collaborators for the synchronizer: line output and y/N prompts.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use notesync_core::render::{ConfirmPrompt, NoteRenderer};
use notesync_core::{Note, NoteId};

use crate::commands::common::{format_note_line, format_note_lines};

/// Prints the list once on load, then one line per change.
pub struct TerminalRenderer<W> {
    out: W,
    limit: Option<usize>,
}

impl<W: Write> TerminalRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self { out, limit: None }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Print a status line between change lines
    pub fn write_line(&mut self, line: &str) {
        if let Err(error) = writeln!(self.out, "{line}") {
            tracing::warn!("Failed to write note output: {}", error);
        }
    }
}

impl<W: Write> NoteRenderer for TerminalRenderer<W> {
    fn render(&mut self, notes: &[Note]) {
        let shown = self.limit.map_or(notes, |limit| &notes[..limit.min(notes.len())]);
        if shown.is_empty() {
            self.write_line("No notes yet");
            return;
        }
        for line in format_note_lines(shown, Utc::now()) {
            self.write_line(&line);
        }
    }

    fn render_insert(&mut self, _index: usize, note: &Note, _notes: &[Note]) {
        let line = format!("+ {}", format_note_line(note, Utc::now()));
        self.write_line(&line);
    }

    fn render_remove(&mut self, id: &NoteId, _notes: &[Note]) {
        let line = format!("- {id}");
        self.write_line(&line);
    }
}

/// Renderer for commands that print their own output
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl NoteRenderer for Silent {
    fn render(&mut self, _notes: &[Note]) {}
}

/// Asks on stderr and reads the answer from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{message} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(error) => {
                tracing::warn!("Failed to read confirmation: {}", error);
                false
            }
        }
    }
}

/// Confirms everything; used for `delete --yes`
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
