use std::io::Write;
use std::path::Path;

use chrono::{Local, Offset};
use notesync_core::{HtmlRenderer, NoteCollection, NoteListSynchronizer};

use crate::cli::ExportFormat;
use crate::error::CliError;
use crate::terminal::AlwaysConfirm;

const EXPORT_TITLE: &str = "Notes";

pub async fn run_export<C, W>(
    collection: C,
    format: ExportFormat,
    output_path: Option<&Path>,
    out: &mut W,
) -> Result<(), CliError>
where
    C: NoteCollection,
    W: Write,
{
    let renderer = HtmlRenderer::with_offset(Local::now().offset().fix());
    let mut sync = NoteListSynchronizer::new(collection, renderer, AlwaysConfirm);
    sync.load().await?;

    let rendered = match format {
        ExportFormat::Html => sync.renderer().to_document(EXPORT_TITLE),
        ExportFormat::Json => serde_json::to_string_pretty(sync.notes())?,
    };

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        writeln!(out, "{}", path.display())?;
    } else {
        writeln!(out, "{rendered}")?;
    }

    Ok(())
}
