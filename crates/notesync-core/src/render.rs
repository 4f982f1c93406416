//! Presentation collaborators driven by the synchronizer.
//!
//! The synchronizer owns the ordered note list; a [`NoteRenderer`] only ever
//! receives projections of it. [`HtmlRenderer`] keeps the markup fragments of
//! a notes page in step with the list and escapes every piece of user text.

use std::fmt::{self, Write as _};

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

use crate::models::{Note, NoteId};

/// Target that displays the local note list.
///
/// Only [`NoteRenderer::render`] is required; the incremental hooks fall back
/// to a full re-render.
pub trait NoteRenderer {
    /// Replace everything shown with `notes` (newest first)
    fn render(&mut self, notes: &[Note]);

    /// `note` now sits at `index` of `notes`
    fn render_insert(&mut self, index: usize, note: &Note, notes: &[Note]) {
        let _ = (index, note);
        self.render(notes);
    }

    /// The note with `id` is gone from `notes`
    fn render_remove(&mut self, id: &NoteId, notes: &[Note]) {
        let _ = id;
        self.render(notes);
    }
}

/// Synchronous yes/no question asked before destructive actions
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Escape text for safe inclusion in HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Human-readable note date, e.g. `Jan 5, 2024, 3:04 PM`
pub fn format_note_date<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp.format("%b %-d, %Y, %-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NoteCard {
    id: NoteId,
    markup: String,
}

/// Markup projection of the notes list
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    cards: Vec<NoteCard>,
    offset: FixedOffset,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    /// Renderer that prints dates in UTC
    pub fn new() -> Self {
        Self::with_offset(Utc.fix())
    }

    /// Renderer that prints dates at the given UTC offset
    pub const fn with_offset(offset: FixedOffset) -> Self {
        Self {
            cards: Vec::new(),
            offset,
        }
    }

    /// One `<div class="note card">` fragment per note, newest first
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|card| card.markup.as_str())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The `#notes` container with all cards
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div id=\"notes\">\n");
        for card in &self.cards {
            html.push_str(&card.markup);
        }
        html.push_str("</div>\n");
        html
    }

    /// Standalone page wrapping [`Self::to_html`]
    pub fn to_document(&self, title: &str) -> String {
        let title = escape_html(title);
        let mut document = String::new();
        let _ = write!(
            document,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{}</body>\n</html>\n",
            self.to_html()
        );
        document
    }

    fn card(&self, note: &Note) -> NoteCard {
        let date = format_note_date(&note.timestamp.with_timezone(&self.offset));
        let markup = format!(
            "<div id=\"{id}\" class=\"note card\">\n  <div class=\"note-date\">{date}</div>\n  <div class=\"note-text\">{text}</div>\n  <button class=\"delete-note-button\" aria-label=\"Delete note\">&times;</button>\n</div>\n",
            id = escape_html(note.id.as_str()),
            date = escape_html(&date),
            text = escape_html(&note.text),
        );
        NoteCard {
            id: note.id.clone(),
            markup,
        }
    }
}

impl NoteRenderer for HtmlRenderer {
    fn render(&mut self, notes: &[Note]) {
        self.cards = notes.iter().map(|note| self.card(note)).collect();
    }

    fn render_insert(&mut self, index: usize, note: &Note, _notes: &[Note]) {
        if self.cards.iter().any(|card| card.id == note.id) {
            return;
        }
        let card = self.card(note);
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    fn render_remove(&mut self, id: &NoteId, _notes: &[Note]) {
        self.cards.retain(|card| &card.id != id);
    }
}
