use clap::{Parser, Subcommand};

/// marknote - Markdown notes in categories, with markers and jump-links
///
/// ## Notes
///
/// ```bash
/// marknote category create work
/// marknote note create work "Project Plan"      # -> work/project-plan.md
/// marknote note create work "Idea" <<EOF
/// # Idea
/// Details...
/// EOF
/// marknote note print work/project-plan.md
/// cat draft.md | marknote note write work/project-plan.md
/// marknote note preview work/project-plan.md > plan.html
/// marknote note rename work/project-plan.md "Roadmap"
/// marknote note search "(?i)deadline"
/// ```
///
/// ## Markers and links
///
/// ```bash
/// marknote marker add work/roadmap.md "Goals" 120
/// marknote marker list work/roadmap.md
/// marknote link add <source-marker-id> <target-marker-id>
/// marknote link check --prune                    # drop links to deleted markers
/// ```
///
/// ## Navigation
///
/// ```bash
/// marknote session work/roadmap.md               # interactive: jump, back, history
/// ```
///
/// ## Environment Variables
///
/// - `MARKNOTE_HOME`: notes root directory (default: ~/.marknote)
/// - `RUST_LOG`: log filter (default: warn)
#[derive(Parser, Debug)]
#[command(name = "marknote")]
#[command(version)]
#[command(about = "Markdown notes in categories, with markers and jump-links")]
pub struct Cli {
    /// Notes root directory (default: ~/.marknote or $MARKNOTE_HOME)
    #[arg(long, value_name = "PATH", global = true)]
    pub home: Option<String>,

    /// Output in JSON format (for scripting)
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage categories (folders of notes)
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// Manage markers placed inside notes
    #[command(subcommand)]
    Marker(MarkerCommand),

    /// Manage jump-links between markers
    #[command(subcommand)]
    Link(LinkCommand),

    /// Manage line bookmarks
    #[command(subcommand)]
    Bookmark(BookmarkCommand),

    /// Interactive navigation session (jump between markers, go back)
    Session {
        /// Note to open at start
        note: Option<String>,

        /// Character offset to start at
        #[arg(default_value = "0")]
        position: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories
    #[command(alias = "ls")]
    List,

    /// Create a category
    Create {
        name: String,
    },

    /// Rename a category, updating markers on its notes
    Rename {
        old: String,
        new: String,
    },

    /// Delete a category and the markers on its notes
    Delete {
        name: String,

        /// Delete even if the category still holds notes
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// List notes (all categories, or one)
    #[command(alias = "ls")]
    List {
        category: Option<String>,
    },

    /// Create a note; content comes from --content or stdin
    Create {
        /// Category (created if missing)
        category: String,

        /// Note title (file name is its slug)
        title: String,

        /// Note content (default: stdin if piped, else a title heading)
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Print note content to stdout
    #[command(alias = "p")]
    Print {
        /// Note identifier (category/file.md)
        note: String,
    },

    /// Replace note content from --content or stdin
    Write {
        note: String,

        #[arg(short, long)]
        content: Option<String>,
    },

    /// Render a note to HTML with marker anchors
    Preview {
        note: String,
    },

    /// Show the heading outline of a note
    Outline {
        note: String,
    },

    /// Rename a note (new title, or full category/file.md)
    #[command(alias = "mv")]
    Rename {
        note: String,
        new_name: String,
    },

    /// Move a note to another category
    Move {
        note: String,
        category: String,
    },

    /// Delete a note and everything anchored to it
    #[command(alias = "rm")]
    Delete {
        note: String,
    },

    /// Search note content with a regular expression
    Search {
        pattern: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MarkerCommand {
    /// Place a marker in a note
    Add {
        /// Note identifier (category/file.md)
        note: String,

        /// Marker name
        name: String,

        /// Character offset in the note
        position: usize,
    },

    /// List markers (all, or in one note)
    #[command(alias = "ls")]
    List {
        note: Option<String>,
    },

    /// Show a marker with its incoming and outgoing links
    Show {
        id: String,
    },

    /// Rename a marker
    Rename {
        id: String,
        name: String,
    },

    /// Move a marker to another offset in its note
    Move {
        id: String,
        position: usize,
    },

    /// Remove a marker and every link touching it
    #[command(alias = "rm")]
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// Link two markers (source -> target)
    Add {
        source: String,
        target: String,
    },

    /// List links
    #[command(alias = "ls")]
    List {
        /// Only links leaving this marker
        #[arg(short, long)]
        marker: Option<String>,
    },

    /// Remove a link
    #[command(alias = "rm")]
    Remove {
        id: String,
    },

    /// Report links whose markers no longer exist
    Check {
        /// Remove the dangling links
        #[arg(long)]
        prune: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommand {
    /// Bookmark a line in a note
    Add {
        note: String,

        /// 1-based line number
        line: usize,

        #[arg(short, long)]
        label: Option<String>,
    },

    /// List bookmarks (all, or in one note)
    #[command(alias = "ls")]
    List {
        note: Option<String>,
    },

    /// Remove a bookmark
    #[command(alias = "rm")]
    Remove {
        id: String,
    },
}
