//! Marker command module

use marknote::cli::MarkerCommand;
use marknote::{util, Error, Marker, Workspace};
use serde_json::json;

use super::output;

pub fn run(ws: &mut Workspace, json: bool, cmd: MarkerCommand) -> marknote::Result<()> {
    match cmd {
        MarkerCommand::Add { note, name, position } => {
            let marker = ws.add_marker(&name, &note, position)?;
            print_marker(json, &marker)
        }
        MarkerCommand::List { note } => {
            let markers: Vec<&Marker> = match note {
                Some(ref n) => ws.graph().markers_in_note(&util::normalize_note_path(n)),
                None => ws.graph().markers().iter().collect(),
            };
            if json {
                return output::print_json(&markers);
            }
            output::print_lines(
                markers
                    .iter()
                    .map(|m| format!("{}  {}:{}  {}", m.id, m.note_path, m.position, m.name)),
                "(no markers)",
            );
            Ok(())
        }
        MarkerCommand::Show { id } => show(ws, json, &id),
        MarkerCommand::Rename { id, name } => {
            let marker = ws.rename_marker(&id, &name)?;
            print_marker(json, &marker)
        }
        MarkerCommand::Move { id, position } => {
            let marker = ws.move_marker(&id, position)?;
            print_marker(json, &marker)
        }
        MarkerCommand::Remove { id } => {
            let removal = ws.remove_marker(&id)?;
            match removal.marker {
                Some(marker) => {
                    eprintln!("Removed marker '{}' ({})", marker.name, marker.id);
                    if removal.links_removed > 0 {
                        eprintln!("  and {} link(s) touching it", removal.links_removed);
                    }
                }
                None => eprintln!("No marker '{}' (nothing to remove)", id),
            }
            Ok(())
        }
    }
}

fn print_marker(json: bool, marker: &Marker) -> marknote::Result<()> {
    if json {
        return output::print_json(marker);
    }
    println!("{}", marker.id);
    Ok(())
}

fn show(ws: &Workspace, json: bool, id: &str) -> marknote::Result<()> {
    let graph = ws.graph();
    let marker = graph
        .resolve_marker(id)
        .ok_or_else(|| Error::not_found("marker", id))?;
    let outgoing = graph.links_from(id);
    let incoming = graph.links_to(id);

    // Report the line as well, when the note is still readable
    let line = ws
        .repo()
        .read_note(&marker.note_path)
        .ok()
        .map(|content| util::line_of_offset(&content, marker.position));

    if json {
        return output::print_json(&json!({
            "marker": marker,
            "line": line,
            "outgoing": outgoing,
            "incoming": incoming,
        }));
    }

    println!("{}  {}", marker.id, marker.name);
    match line {
        Some(l) => println!("  at {}:{} (line {})", marker.note_path, marker.position, l),
        None => println!("  at {}:{} (note missing)", marker.note_path, marker.position),
    }
    for link in outgoing {
        println!("  -> {}  {}", graph.marker_label(&link.target_marker_id), link.id);
    }
    for link in incoming {
        println!("  <- {}  {}", graph.marker_label(&link.source_marker_id), link.id);
    }
    Ok(())
}
