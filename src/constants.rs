//! Constants for marknote
//!
//! File names, id prefixes and other fixed values used across the crate.

// === File and Directory Names ===

/// Default notes root directory name (under the user's home)
pub const DEFAULT_NOTES_DIR: &str = ".marknote";

/// Default metadata sidecar file name, stored at the notes root
pub const DEFAULT_METADATA_FILE: &str = ".marknote.json";

/// Optional configuration file at the notes root
pub const CONFIG_FILENAME: &str = "marknote.yaml";

/// Default category for notes created without one
pub const DEFAULT_CATEGORY: &str = "inbox";

/// Extension (without dot) recognised as a note
pub const MARKDOWN_EXT: &str = "md";

/// Default file extension for notes
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Suffix given to an unparseable metadata file when it is set aside
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Suffix of the temporary file written before an atomic rename
pub const TEMP_SUFFIX: &str = ".tmp";

// === Environment Variables ===

/// Overrides the notes root directory
pub const ENV_HOME: &str = "MARKNOTE_HOME";

// === Ids ===

pub const MARKER_ID_PREFIX: &str = "m";
pub const LINK_ID_PREFIX: &str = "l";
pub const BOOKMARK_ID_PREFIX: &str = "b";

/// Timestamp layout embedded in generated ids
pub const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

// === Display ===

/// Label shown for a link endpoint that no longer resolves
pub const UNKNOWN_LABEL: &str = "unknown";

/// Default CSS class for marker anchors in the HTML preview
pub const DEFAULT_MARKER_CLASS: &str = "marker";

/// Prefix of the element id given to marker anchors in the HTML preview
pub const MARKER_ANCHOR_PREFIX: &str = "marker-";

/// Title used when a note has no H1 and no usable file stem
pub const UNTITLED_NOTE_TITLE: &str = "Untitled";
