//! Link command module

use marknote::cli::LinkCommand;
use marknote::{Link, Workspace};
use serde_json::json;

use super::output;

pub fn run(ws: &mut Workspace, json: bool, cmd: LinkCommand) -> marknote::Result<()> {
    match cmd {
        LinkCommand::Add { source, target } => {
            let link = ws.add_link(&source, &target)?;
            if json {
                return output::print_json(&link);
            }
            println!("{}", link.id);
            Ok(())
        }
        LinkCommand::List { marker } => {
            let graph = ws.graph();
            let links: Vec<&Link> = match marker {
                Some(ref m) => graph.links_from(m),
                None => graph.links().iter().collect(),
            };
            print_links(ws, json, &links)
        }
        LinkCommand::Remove { id } => {
            let link = ws.remove_link(&id)?;
            eprintln!("Removed link {}", link.id);
            Ok(())
        }
        LinkCommand::Check { prune } => check(ws, json, prune),
    }
}

fn print_links(ws: &Workspace, json: bool, links: &[&Link]) -> marknote::Result<()> {
    let graph = ws.graph();
    if json {
        let value: Vec<_> = links
            .iter()
            .map(|l| json!({ "link": l, "label": graph.link_label(l) }))
            .collect();
        return output::print_json(&value);
    }

    output::print_lines(
        links.iter().map(|l| format!("{}  {}", l.id, graph.link_label(l))),
        "(no links)",
    );
    Ok(())
}

/// Report dangling links, optionally pruning them
fn check(ws: &mut Workspace, json: bool, prune: bool) -> marknote::Result<()> {
    let dangling: Vec<Link> = ws.graph().dangling_links().into_iter().cloned().collect();

    if dangling.is_empty() {
        if json {
            return output::print_json(&dangling);
        }
        println!("No dangling links found. OK.");
        return Ok(());
    }

    if prune {
        let removed = ws.prune_dangling_links()?;
        eprintln!("Removed {} dangling link(s)", removed);
        return Ok(());
    }

    if json {
        output::print_json(&dangling)?;
    } else {
        eprintln!("Found {} dangling link(s):", dangling.len());
        for link in &dangling {
            eprintln!("  {}  {}", link.id, ws.graph().link_label(link));
        }
    }
    Err(marknote::Error::Message(format!(
        "Found {} dangling link(s) (use --prune to remove)",
        dangling.len()
    )))
}
