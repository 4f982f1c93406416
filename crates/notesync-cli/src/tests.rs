use chrono::{Duration, TimeZone, Utc};
use notesync_core::remote::memory::InMemoryCollection;
use notesync_core::render::NoteRenderer;
use notesync_core::{Note, NoteId};
use pretty_assertions::assert_eq;

use crate::cli::{CompletionShell, ExportFormat};
use crate::commands::add::run_add;
use crate::commands::common::{
    format_relative_time, normalize_content, normalize_note_identifier, note_preview,
    note_to_list_item,
};
use crate::commands::completions::{completion_script, run_completions};
use crate::commands::config::{run_config_init, run_config_show, ConfigInit};
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::watch::{parse_watch_input, run_watch, WatchInput};
use crate::error::CliError;
use crate::terminal::{is_affirmative, AlwaysConfirm, TerminalRenderer};

fn note(id: &str, minutes_ago: i64, text: &str) -> Note {
    Note {
        id: NoteId::new(id),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        text: text.to_string(),
    }
}

fn seeded() -> InMemoryCollection {
    InMemoryCollection::with_notes(vec![
        note("old", 90, "Oldest note"),
        note("new", 5, "Newest note"),
        note("mid", 30, "Middle note"),
    ])
}

fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalize_content_keeps_multiline_text() {
    assert_eq!(
        normalize_content("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn normalize_note_identifier_rejects_blank_ids() {
    assert!(matches!(
        normalize_note_identifier(" \n "),
        Err(CliError::EmptyNoteId)
    ));
    assert_eq!(
        normalize_note_identifier("  abc123  ").unwrap(),
        NoteId::new("abc123")
    );
}

#[test]
fn format_relative_time_buckets() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 5_000, now), "just now");
    assert_eq!(format_relative_time(now - 5 * 60_000, now), "5m ago");
    assert_eq!(format_relative_time(now - 3 * 3_600_000, now), "3h ago");
    assert_eq!(format_relative_time(now - 2 * 86_400_000, now), "2d ago");
    assert_eq!(format_relative_time(now + 60_000, now), "just now");
}

#[test]
fn note_preview_uses_first_line_and_truncates() {
    let note = note("a", 0, "A fairly long   first line of text\nsecond line");
    assert_eq!(note_preview(&note, 80), "A fairly long first line of text");
    assert_eq!(note_preview(&note, 10), "A fairly...");
}

#[test]
fn note_to_list_item_carries_rfc3339_date() {
    let note = Note {
        id: NoteId::new("n1"),
        timestamp: Utc.with_ymd_and_hms(2024, 1, 5, 15, 4, 0).unwrap(),
        text: "hello".to_string(),
    };
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 16, 4, 0).unwrap();

    let item = note_to_list_item(&note, now);
    assert_eq!(item.date, "2024-01-05T15:04:00+00:00");
    assert_eq!(item.relative_time, "1h ago");
    assert_eq!(item.preview, "hello");
}

#[test]
fn watch_input_parsing() {
    assert_eq!(parse_watch_input("  "), WatchInput::Blank);
    assert_eq!(parse_watch_input("/quit"), WatchInput::Quit);
    assert_eq!(
        parse_watch_input("/delete  abc "),
        WatchInput::Delete(NoteId::new("abc"))
    );
    assert_eq!(
        parse_watch_input(" buy milk "),
        WatchInput::Create("buy milk".to_string())
    );
    assert_eq!(
        parse_watch_input("/delete "),
        WatchInput::Create("/delete".to_string())
    );
}

#[test]
fn affirmative_answers() {
    assert!(is_affirmative("y\n"));
    assert!(is_affirmative(" YES "));
    assert!(!is_affirmative("\n"));
    assert!(!is_affirmative("nope"));
}

#[test]
fn terminal_renderer_prints_changes_as_lines() {
    let mut buffer = Vec::new();
    {
        let mut renderer = TerminalRenderer::new(&mut buffer).with_limit(1);
        let notes = vec![note("b", 1, "second"), note("a", 2, "first")];
        renderer.render(&notes);
        renderer.render_insert(0, &notes[0], &notes);
        renderer.render_remove(&NoteId::new("a"), &notes[..1]);
    }

    let printed = output(buffer);
    let lines = printed.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with('b'));
    assert!(lines[0].contains("second"));
    assert!(lines[1].starts_with("+ b"));
    assert_eq!(lines[2], "- a");
}

#[tokio::test]
async fn run_list_prints_newest_first_with_limit() {
    let mut buffer = Vec::new();
    run_list(seeded(), 2, false, &mut buffer).await.unwrap();

    let printed = output(buffer);
    let lines = printed.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Newest note"));
    assert!(lines[1].contains("Middle note"));
}

#[tokio::test]
async fn run_list_reports_empty_collection() {
    let mut buffer = Vec::new();
    run_list(InMemoryCollection::new(), 10, false, &mut buffer)
        .await
        .unwrap();
    assert_eq!(output(buffer), "No notes yet\n");
}

#[tokio::test]
async fn run_list_json_outputs_items() {
    let mut buffer = Vec::new();
    run_list(seeded(), 10, true, &mut buffer).await.unwrap();

    let items: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    let ids = items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn run_add_prints_assigned_id() {
    let collection = InMemoryCollection::new();
    let mut buffer = Vec::new();

    run_add(collection.clone(), "remember this", &mut buffer)
        .await
        .unwrap();

    let stored = collection.notes();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, "remember this");
    assert_eq!(output(buffer).trim(), stored[0].id.as_str());
}

#[tokio::test]
async fn run_add_surfaces_remote_failure() {
    let collection = InMemoryCollection::new();
    collection.set_outage(Some("maintenance"));
    let mut buffer = Vec::new();

    let error = run_add(collection.clone(), "remember this", &mut buffer)
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::Core(_)));
    assert!(error.to_string().contains("maintenance"));
    assert!(buffer.is_empty());
}

#[tokio::test]
async fn run_delete_removes_confirmed_note() {
    let collection = seeded();
    let mut buffer = Vec::new();

    run_delete(collection.clone(), " mid ", AlwaysConfirm, &mut buffer)
        .await
        .unwrap();

    assert_eq!(output(buffer), "mid\n");
    assert_eq!(collection.len(), 2);
    assert!(collection.notes().iter().all(|note| note.id.as_str() != "mid"));
}

#[tokio::test]
async fn run_delete_keeps_note_when_declined() {
    let collection = seeded();
    let mut buffer = Vec::new();

    run_delete(collection.clone(), "mid", |_: &str| false, &mut buffer)
        .await
        .unwrap();

    assert_eq!(output(buffer), "Kept mid\n");
    assert_eq!(collection.len(), 3);
}

#[tokio::test]
async fn run_delete_rejects_unknown_id() {
    let mut buffer = Vec::new();
    let error = run_delete(seeded(), "missing", AlwaysConfirm, &mut buffer)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        CliError::Core(notesync_core::Error::NoteNotFound(_))
    ));
}

#[tokio::test]
async fn run_export_html_escapes_text() {
    let collection = InMemoryCollection::with_notes(vec![note("x", 1, "<b>bold</b> & co")]);
    let mut buffer = Vec::new();

    run_export(collection, ExportFormat::Html, None, &mut buffer)
        .await
        .unwrap();

    let html = output(buffer);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; co"));
    assert!(!html.contains("<b>"));
}

#[tokio::test]
async fn run_export_json_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let mut buffer = Vec::new();

    run_export(seeded(), ExportFormat::Json, Some(&path), &mut buffer)
        .await
        .unwrap();

    assert_eq!(output(buffer).trim(), path.display().to_string());
    let exported: Vec<Note> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let ids = exported
        .iter()
        .map(|note| note.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn run_watch_creates_and_deletes_from_input() {
    let collection = seeded();
    let input: &[u8] = b"buy milk\n\n/delete old\ny\n/quit\nignored after quit\n";
    let mut buffer = Vec::new();

    run_watch(collection.clone(), input, &mut buffer)
        .await
        .unwrap();

    let texts = collection
        .notes()
        .into_iter()
        .map(|note| note.text)
        .collect::<Vec<_>>();
    assert_eq!(texts.len(), 3);
    assert!(texts.contains(&"buy milk".to_string()));
    assert!(!texts.contains(&"Oldest note".to_string()));
    assert!(!texts.contains(&"ignored after quit".to_string()));

    let printed = output(buffer);
    assert!(printed.contains("Newest note"));
    assert!(printed.lines().any(|line| line.starts_with("+ ") && line.contains("buy milk")));
    assert!(printed.lines().any(|line| line == "Created!"));
    assert!(printed.lines().any(|line| line == "Delete note forever? [y/N]"));
    assert!(printed.lines().any(|line| line == "- old"));
}

#[tokio::test]
async fn run_watch_keeps_note_when_delete_is_declined() {
    let collection = seeded();
    let input: &[u8] = b"/delete old\nn\n/quit\n";
    let mut buffer = Vec::new();

    run_watch(collection.clone(), input, &mut buffer)
        .await
        .unwrap();

    assert_eq!(collection.len(), 3);
    let printed = output(buffer);
    assert!(printed.lines().any(|line| line == "Delete note forever? [y/N]"));
    assert!(printed.lines().any(|line| line == "Kept old"));
    assert!(!printed.lines().any(|line| line == "- old"));
}

#[tokio::test]
async fn run_watch_answer_line_is_not_created_as_a_note() {
    let collection = seeded();
    let input: &[u8] = b"/delete mid\nyes\n";
    let mut buffer = Vec::new();

    run_watch(collection.clone(), input, &mut buffer)
        .await
        .unwrap();

    let texts = collection
        .notes()
        .into_iter()
        .map(|note| note.text)
        .collect::<Vec<_>>();
    assert_eq!(texts.len(), 2);
    assert!(!texts.contains(&"Middle note".to_string()));
    assert!(!texts.contains(&"yes".to_string()));
}

#[tokio::test]
async fn run_watch_does_not_prompt_for_unknown_note() {
    let collection = seeded();
    let input: &[u8] = b"/delete missing\ny\n";
    let mut buffer = Vec::new();

    run_watch(collection.clone(), input, &mut buffer)
        .await
        .unwrap();

    // Without a pending delete, "y" is captured as a note.
    assert_eq!(collection.len(), 4);
    let printed = output(buffer);
    assert!(!printed.contains("Delete note forever?"));
}

#[tokio::test]
async fn run_watch_stops_at_end_of_input() {
    let collection = InMemoryCollection::new();
    let input: &[u8] = b"only line";
    let mut buffer = Vec::new();

    run_watch(collection.clone(), input, &mut buffer)
        .await
        .unwrap();

    assert_eq!(collection.len(), 1);
    assert_eq!(collection.subscriber_count(), 0);
}

#[test]
fn config_init_then_show_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut buffer = Vec::new();

    run_config_init(
        &path,
        ConfigInit {
            api_url: Some("https://notes.example.com/".to_string()),
            collection: Some(" shared ".to_string()),
            ..ConfigInit::default()
        },
        &mut buffer,
    )
    .unwrap();
    assert!(output(std::mem::take(&mut buffer)).starts_with("Config written to"));

    run_config_init(
        &path,
        ConfigInit {
            poll_interval_ms: Some(750),
            ..ConfigInit::default()
        },
        &mut buffer,
    )
    .unwrap();
    buffer.clear();

    run_config_show(&path, &mut buffer).unwrap();
    let shown = output(buffer);
    assert!(shown.contains("\"collection\": \"shared\""));
    assert!(shown.contains("\"poll_interval_ms\": 750"));
}

#[test]
fn config_init_rejects_invalid_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut buffer = Vec::new();

    let error = run_config_init(
        &path,
        ConfigInit {
            api_url: Some("notes.example.com".to_string()),
            ..ConfigInit::default()
        },
        &mut buffer,
    )
    .unwrap_err();

    assert!(error.to_string().contains("http://"));
    assert!(!path.exists());
}

#[test]
fn completion_script_names_the_binary_and_subcommands() {
    let script = String::from_utf8(completion_script(CompletionShell::Bash)).unwrap();

    assert!(script.contains("notesync"));
    assert!(script.contains("watch"));
    assert!(script.contains("export"));
}

#[test]
fn run_completions_writes_script_to_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notesync.fish");
    let mut buffer = Vec::new();

    run_completions(CompletionShell::Fish, Some(path.as_path()), &mut buffer).unwrap();

    assert_eq!(output(buffer).trim(), path.display().to_string());
    let script = std::fs::read_to_string(&path).unwrap();
    assert!(script.contains("complete -c notesync"));
}
