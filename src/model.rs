//! Records kept in the metadata sidecar, plus the ephemeral navigation entry

use serde::{Deserialize, Serialize};

/// A named bookmark anchored to a note and a character offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub note_path: String,
    #[serde(default)]
    pub position: usize,
}

/// A directed jump from one marker to another, by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source_marker_id: String,
    #[serde(default)]
    pub target_marker_id: String,
}

impl Link {
    /// Whether either endpoint is the given marker
    pub fn touches(&self, marker_id: &str) -> bool {
        self.source_marker_id == marker_id || self.target_marker_id == marker_id
    }
}

/// A 1-based line bookmark inside a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBookmark {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub note_path: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Where the user was before a jump. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    pub note_path: String,
    pub position: usize,
}

impl NavigationEntry {
    pub fn new(note_path: impl Into<String>, position: usize) -> Self {
        Self {
            note_path: note_path.into(),
            position,
        }
    }
}
