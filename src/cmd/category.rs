//! Category command module

use marknote::cli::CategoryCommand;
use marknote::{util, Workspace};

use super::output;

pub fn run(ws: &mut Workspace, json: bool, cmd: CategoryCommand) -> marknote::Result<()> {
    match cmd {
        CategoryCommand::List => {
            let categories = ws.repo().list_categories()?;
            if json {
                return output::print_json(&categories);
            }
            output::print_lines(categories.into_iter().map(|c| format!("  - {}", c)), "  (none)");
        }
        CategoryCommand::Create { name } => {
            let dir = ws.repo().create_category(&name)?;
            println!("{}", util::display_path(&dir));
        }
        CategoryCommand::Rename { old, new } => {
            let renames = ws.rename_category(&old, &new)?;
            eprintln!("Renamed category '{}' to '{}' ({} note(s))", old, new, renames.len());
        }
        CategoryCommand::Delete { name, force } => {
            let cleanup = ws.delete_category(&name, force)?;
            eprintln!("Deleted category '{}'", name);
            if !cleanup.is_empty() {
                eprintln!(
                    "  removed {} marker(s), {} link(s), {} bookmark(s)",
                    cleanup.markers_removed, cleanup.links_removed, cleanup.bookmarks_removed
                );
            }
        }
    }
    Ok(())
}
