//! Line bookmark command module

use marknote::cli::BookmarkCommand;
use marknote::{util, LineBookmark, Workspace};

use super::output;

pub fn run(ws: &mut Workspace, json: bool, cmd: BookmarkCommand) -> marknote::Result<()> {
    match cmd {
        BookmarkCommand::Add { note, line, label } => {
            let bookmark = ws.add_bookmark(&note, line, label)?;
            if json {
                return output::print_json(&bookmark);
            }
            println!("{}", bookmark.id);
            Ok(())
        }
        BookmarkCommand::List { note } => {
            let bookmarks: Vec<&LineBookmark> = match note {
                Some(ref n) => ws.graph().bookmarks_in_note(&util::normalize_note_path(n)),
                None => ws.graph().bookmarks().iter().collect(),
            };
            if json {
                return output::print_json(&bookmarks);
            }
            output::print_lines(
                bookmarks.iter().map(|b| {
                    format!(
                        "{}  {}:{}  {}",
                        b.id,
                        b.note_path,
                        b.line,
                        b.label.as_deref().unwrap_or("")
                    )
                    .trim_end()
                    .to_string()
                }),
                "(no bookmarks)",
            );
            Ok(())
        }
        BookmarkCommand::Remove { id } => {
            let bookmark = ws.remove_bookmark(&id)?;
            eprintln!("Removed bookmark {}", bookmark.id);
            Ok(())
        }
    }
}
