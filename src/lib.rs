pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod graph;
pub mod history;
pub mod model;
pub mod preview;
pub mod repository;
pub mod session;
pub mod store;
pub mod util;
pub mod workspace;

pub use cli::{Cli, Command};
pub use config::{default_notes_path, notes_path, Config, Settings};
pub use error::{Error, Result};
pub use graph::{MarkerGraph, MarkerRemoval, NoteCleanup};
pub use history::NavigationHistory;
pub use model::{LineBookmark, Link, Marker, NavigationEntry};
pub use repository::{NoteRename, NoteRepository, SearchHit};
pub use session::{Reply, Session};
pub use store::MetadataStore;
pub use workspace::Workspace;
