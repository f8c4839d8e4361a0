//! Note command module

use std::io::{self, IsTerminal, Read};

use marknote::cli::NoteCommand;
use marknote::{preview, util, Error, Workspace};
use serde_json::json;

use super::output;

pub fn run(ws: &mut Workspace, json: bool, cmd: NoteCommand) -> marknote::Result<()> {
    match cmd {
        NoteCommand::List { category } => list(ws, json, category.as_deref()),
        NoteCommand::Create { category, title, content } => {
            let content = match content {
                Some(c) => Some(c),
                None => read_stdin_content()?,
            };
            let note_path = ws.create_note(Some(category.as_str()), &title, content.as_deref())?;
            // Output identifier for shell pipeline compatibility
            println!("{}", note_path);
            Ok(())
        }
        NoteCommand::Print { note } => {
            print!("{}", ws.repo().read_note(&note)?);
            Ok(())
        }
        NoteCommand::Write { note, content } => {
            let content = match content {
                Some(c) => c,
                None => read_stdin_content()?.ok_or_else(|| {
                    Error::Message("no content given (use --content or pipe it on stdin)".to_string())
                })?,
            };
            ws.repo().write_note(&note, &content)?;
            eprintln!("Wrote note: {}", util::normalize_note_path(&note));
            Ok(())
        }
        NoteCommand::Preview { note } => {
            println!("{}", ws.render_note(&note)?);
            Ok(())
        }
        NoteCommand::Outline { note } => {
            let headings = preview::outline(&ws.repo().read_note(&note)?);
            if json {
                return output::print_json(&headings);
            }
            output::print_lines(
                headings
                    .iter()
                    .map(|h| format!("{}{}", "  ".repeat(usize::from(h.level.saturating_sub(1))), h.text)),
                "(no headings)",
            );
            Ok(())
        }
        NoteCommand::Rename { note, new_name } => {
            let rename = ws.rename_note(&note, &new_name)?;
            println!("{}", rename.new_path);
            Ok(())
        }
        NoteCommand::Move { note, category } => {
            let rename = ws.move_note(&note, &category)?;
            println!("{}", rename.new_path);
            Ok(())
        }
        NoteCommand::Delete { note } => {
            let cleanup = ws.delete_note(&note)?;
            eprintln!("Deleted note: {}", util::normalize_note_path(&note));
            if !cleanup.is_empty() {
                eprintln!(
                    "  removed {} marker(s), {} link(s), {} bookmark(s)",
                    cleanup.markers_removed, cleanup.links_removed, cleanup.bookmarks_removed
                );
            }
            Ok(())
        }
        NoteCommand::Search { pattern } => {
            let hits = ws.repo().search(&pattern)?;
            if json {
                return output::print_json(&hits);
            }
            output::print_lines(
                hits.iter().map(|h| format!("{}:{}: {}", h.note_path, h.line, h.text)),
                "(no matches)",
            );
            Ok(())
        }
    }
}

fn list(ws: &Workspace, json: bool, category: Option<&str>) -> marknote::Result<()> {
    let notes = match category {
        Some(c) => ws.repo().list_notes(c)?,
        None => ws.repo().list_all_notes()?,
    };

    let mut rows = Vec::with_capacity(notes.len());
    for note_path in notes {
        let content = ws.repo().read_note(&note_path)?;
        let title = preview::note_title(&note_path, &content);
        let markers = ws.graph().markers_in_note(&note_path).len();
        rows.push((note_path, title, markers));
    }

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|(path, title, markers)| json!({ "path": path, "title": title, "markers": markers }))
            .collect();
        return output::print_json(&value);
    }

    output::print_lines(
        rows.into_iter().map(|(path, title, markers)| {
            if markers > 0 {
                format!("{}  {}  [{} marker(s)]", path, title, markers)
            } else {
                format!("{}  {}", path, title)
            }
        }),
        "(no notes)",
    );
    Ok(())
}

/// Read content from stdin when it is piped, None for an interactive terminal
fn read_stdin_content() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    match stdin.lock().read_to_string(&mut buffer) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(buffer)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}
