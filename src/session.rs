//! Interactive navigation session
//!
//! Keeps a current position (note + character offset) and one navigation
//! history for as long as the session runs, so `jump` and `back` behave the
//! way they do in an editor. Each input line is one command.

use crate::error::{Error, Result};
use crate::model::NavigationEntry;
use crate::workspace::Workspace;

pub const HELP: &str = "\
commands:
  open <note> [pos]   open a note at an offset (default 0)
  goto <pos>          move within the current note
  where               show the current position and where back leads
  markers             list markers in the current note
  links               list links leaving markers in the current note
  jump <link-id>      follow a link, remembering where you were
  follow <marker-id>  jump straight to a marker
  back                return to where the last jump started
  history             show the back-stack, most recent first
  clear               forget the back-stack
  help                show this text
  quit                leave the session";

/// Result of one session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Session<'a> {
    workspace: &'a mut Workspace,
    current: Option<NavigationEntry>,
}

impl<'a> Session<'a> {
    pub fn new(workspace: &'a mut Workspace) -> Self {
        Self {
            workspace,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&NavigationEntry> {
        self.current.as_ref()
    }

    /// Run one input line
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Reply::Text(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let text = match command {
            "open" => {
                let note = arg(&args, 0, "open <note> [pos]")?;
                let position = optional_position(&args, 1)?.unwrap_or(0);
                self.open(note, position)?
            }
            "goto" => {
                let position = optional_position(&args, 0)?
                    .ok_or_else(|| Error::Message("usage: goto <pos>".to_string()))?;
                let current = self.current_mut()?;
                current.position = position;
                describe(current)
            }
            "where" => {
                let here = describe(self.current_ref()?);
                match self.workspace.history().peek() {
                    Some(previous) => format!("{} (back: {})", here, describe(previous)),
                    None => here,
                }
            }
            "markers" => self.markers()?,
            "links" => self.links()?,
            "jump" => {
                let link_id = arg(&args, 0, "jump <link-id>")?;
                let from = self.current_ref()?.clone();
                let target = self.workspace.jump(link_id, &from.note_path, from.position)?;
                self.arrive(NavigationEntry::new(target.note_path.clone(), target.position), &target.name)
            }
            "follow" => {
                let marker_id = arg(&args, 0, "follow <marker-id>")?;
                let from = self.current_ref()?.clone();
                let target = self
                    .workspace
                    .jump_to_marker(marker_id, &from.note_path, from.position)?;
                self.arrive(NavigationEntry::new(target.note_path.clone(), target.position), &target.name)
            }
            "back" => match self.workspace.back() {
                Some(entry) => {
                    let text = format!("back to {}", describe(&entry));
                    self.current = Some(entry);
                    text
                }
                None => "history is empty".to_string(),
            },
            "history" => {
                let lines: Vec<String> = self.workspace.history().iter().map(describe).collect();
                if lines.is_empty() {
                    "history is empty".to_string()
                } else {
                    lines.join("\n")
                }
            }
            "clear" => {
                self.workspace.clear_history();
                "history cleared".to_string()
            }
            "help" => HELP.to_string(),
            "quit" | "exit" => return Ok(Reply::Quit),
            other => {
                return Err(Error::Message(format!(
                    "unknown command '{}' (try 'help')",
                    other
                )))
            }
        };

        Ok(Reply::Text(text))
    }

    /// Make `note` the current position
    pub fn open(&mut self, note: &str, position: usize) -> Result<String> {
        if !self.workspace.repo().exists(note) {
            return Err(Error::not_found("note", note));
        }
        let entry = NavigationEntry::new(crate::util::normalize_note_path(note), position);
        let text = describe(&entry);
        self.current = Some(entry);
        Ok(text)
    }

    fn arrive(&mut self, entry: NavigationEntry, marker_name: &str) -> String {
        let text = format!("at '{}' {}", marker_name, describe(&entry));
        self.current = Some(entry);
        text
    }

    fn current_ref(&self) -> Result<&NavigationEntry> {
        self.current
            .as_ref()
            .ok_or_else(|| Error::Message("no note open (use 'open <note>')".to_string()))
    }

    fn current_mut(&mut self) -> Result<&mut NavigationEntry> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::Message("no note open (use 'open <note>')".to_string()))
    }

    fn markers(&self) -> Result<String> {
        let current = self.current_ref()?;
        let graph = self.workspace.graph();
        let lines: Vec<String> = graph
            .markers_in_note(&current.note_path)
            .iter()
            .map(|m| format!("{}  @{}  {}", m.id, m.position, m.name))
            .collect();
        Ok(if lines.is_empty() {
            "no markers in this note".to_string()
        } else {
            lines.join("\n")
        })
    }

    fn links(&self) -> Result<String> {
        let current = self.current_ref()?;
        let graph = self.workspace.graph();
        let lines: Vec<String> = graph
            .markers_in_note(&current.note_path)
            .iter()
            .flat_map(|m| graph.links_from(&m.id))
            .map(|l| format!("{}  {}", l.id, graph.link_label(l)))
            .collect();
        Ok(if lines.is_empty() {
            "no links leave this note".to_string()
        } else {
            lines.join("\n")
        })
    }
}

fn describe(entry: &NavigationEntry) -> String {
    format!("{}:{}", entry.note_path, entry.position)
}

fn arg<'s>(args: &[&'s str], index: usize, usage: &str) -> Result<&'s str> {
    args.get(index)
        .copied()
        .ok_or_else(|| Error::Message(format!("usage: {}", usage)))
}

fn optional_position(args: &[&str], index: usize) -> Result<Option<usize>> {
    match args.get(index) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::Message(format!("'{}' is not a character offset", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(t) => t,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_session_jump_and_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(Config::with_root(temp_dir.path()));
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let y = ws.create_note(Some("cat"), "y", None).unwrap();
        let a = ws.add_marker("A", &x, 1).unwrap();
        let b = ws.add_marker("B", &y, 7).unwrap();
        let l = ws.add_link(&a.id, &b.id).unwrap();

        let mut session = Session::new(&mut ws);

        assert!(session.execute("jump x").is_err());
        assert_eq!(text(session.execute("back").unwrap()), "history is empty");

        session.execute(&format!("open {} 3", x)).unwrap();
        session.execute("goto 5").unwrap();
        let out = text(session.execute("links").unwrap());
        assert!(out.contains("A -> B"));

        let out = text(session.execute(&format!("jump {}", l.id)).unwrap());
        assert_eq!(out, "at 'B' cat/y.md:7");

        let out = text(session.execute("back").unwrap());
        assert_eq!(out, "back to cat/x.md:5");
        assert_eq!(session.current(), Some(&NavigationEntry::new("cat/x.md", 5)));

        // back is not pushed, so there is no way forward again
        assert_eq!(text(session.execute("back").unwrap()), "history is empty");
    }

    #[test]
    fn test_session_follow_and_history() {
        let temp_dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(Config::with_root(temp_dir.path()));
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let a = ws.add_marker("A", &x, 2).unwrap();

        let mut session = Session::new(&mut ws);
        session.execute(&format!("open {}", x)).unwrap();
        session.execute(&format!("follow {}", a.id)).unwrap();
        session.execute(&format!("follow {}", a.id)).unwrap();

        let out = text(session.execute("history").unwrap());
        assert_eq!(out, "cat/x.md:2\ncat/x.md:0");
    }

    #[test]
    fn test_session_input_errors() {
        let temp_dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(Config::with_root(temp_dir.path()));
        let mut session = Session::new(&mut ws);

        assert!(matches!(session.execute("open"), Err(Error::Message(_))));
        assert!(matches!(session.execute("open cat/none.md"), Err(Error::NotFound { .. })));
        assert!(matches!(session.execute("goto abc"), Err(Error::Message(_))));
        assert!(matches!(session.execute("dance"), Err(Error::Message(_))));
        assert_eq!(session.execute("").unwrap(), Reply::Text(String::new()));
        assert_eq!(session.execute("quit").unwrap(), Reply::Quit);
    }

    #[test]
    fn test_session_open_note_with_spaces() {
        let temp_dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(Config::with_root(temp_dir.path()));
        std::fs::create_dir_all(temp_dir.path().join("cat")).unwrap();
        std::fs::write(temp_dir.path().join("cat/my plan.md"), "# Plan\n").unwrap();

        let mut session = Session::new(&mut ws);
        assert_eq!(session.open("cat/my plan.md", 4).unwrap(), "cat/my plan.md:4");
        assert_eq!(session.current(), Some(&NavigationEntry::new("cat/my plan.md", 4)));
    }

    #[test]
    fn test_session_where_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let mut ws = Workspace::open(Config::with_root(temp_dir.path()));
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let a = ws.add_marker("A", &x, 2).unwrap();

        let mut session = Session::new(&mut ws);
        session.execute(&format!("open {} 6", x)).unwrap();
        assert_eq!(text(session.execute("where").unwrap()), "cat/x.md:6");

        session.execute(&format!("follow {}", a.id)).unwrap();
        assert_eq!(text(session.execute("where").unwrap()), "cat/x.md:2 (back: cat/x.md:6)");

        assert_eq!(text(session.execute("clear").unwrap()), "history cleared");
        assert_eq!(text(session.execute("back").unwrap()), "history is empty");
    }
}
