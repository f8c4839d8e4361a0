//! MarkerGraph - markers, jump-links and line bookmarks
//!
//! Links refer to markers by id only. Removing a marker is a filter pass over
//! the link list; nothing keeps back-pointers. Markers are looked up through an
//! id -> slot index that is rebuilt whenever the marker list shrinks.

use std::collections::{HashMap, HashSet};

use crate::constants as C;
use crate::error::{Error, Result};
use crate::model::{LineBookmark, Link, Marker};
use crate::store::MetadataStore;
use crate::util;

/// Outcome of removing a marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerRemoval {
    /// The marker that was removed, if it existed
    pub marker: Option<Marker>,
    /// Number of links dropped because they touched it
    pub links_removed: usize,
}

/// Outcome of removing everything attached to a note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCleanup {
    pub markers_removed: usize,
    pub links_removed: usize,
    pub bookmarks_removed: usize,
}

impl NoteCleanup {
    pub fn is_empty(&self) -> bool {
        self.markers_removed == 0 && self.links_removed == 0 && self.bookmarks_removed == 0
    }
}

/// In-memory marker/link graph backed by a [`MetadataStore`]
#[derive(Debug, Default)]
pub struct MarkerGraph {
    store: MetadataStore,
    index: HashMap<String, usize>,
}

impl MarkerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph over a loaded store.
    ///
    /// Records with an empty or repeated id are dropped (the first of each id
    /// wins) so every id resolves to exactly one record.
    pub fn from_store(mut store: MetadataStore) -> Self {
        retain_unique("marker", &mut store.markers, |m| &m.id);
        retain_unique("link", &mut store.links, |l| &l.id);
        retain_unique("bookmark", &mut store.bookmarks, |b| &b.id);

        let mut graph = Self {
            store,
            index: HashMap::new(),
        };
        graph.reindex();
        graph
    }

    /// The persisted aggregate, in insertion order
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub fn markers(&self) -> &[Marker] {
        &self.store.markers
    }

    pub fn links(&self) -> &[Link] {
        &self.store.links
    }

    pub fn bookmarks(&self) -> &[LineBookmark] {
        &self.store.bookmarks
    }

    fn reindex(&mut self) {
        self.index = self
            .store
            .markers
            .iter()
            .enumerate()
            .map(|(slot, m)| (m.id.clone(), slot))
            .collect();
    }

    // === Markers ===

    /// Create a marker with a fresh id and append it
    pub fn add_marker(
        &mut self,
        name: impl Into<String>,
        note_path: impl Into<String>,
        position: usize,
    ) -> Marker {
        let id = util::fresh_id(C::MARKER_ID_PREFIX, |id| self.index.contains_key(id));
        let marker = Marker {
            id: id.clone(),
            name: name.into(),
            note_path: note_path.into(),
            position,
        };

        self.index.insert(id, self.store.markers.len());
        self.store.markers.push(marker.clone());
        log::debug!("added marker {} at {}:{}", marker.id, marker.note_path, marker.position);
        marker
    }

    pub fn resolve_marker(&self, id: &str) -> Option<&Marker> {
        self.index.get(id).map(|&slot| &self.store.markers[slot])
    }

    fn resolve_marker_mut(&mut self, id: &str) -> Option<&mut Marker> {
        let slot = *self.index.get(id)?;
        self.store.markers.get_mut(slot)
    }

    /// Remove a marker and every link that touches it. Unknown ids are a no-op.
    pub fn remove_marker(&mut self, id: &str) -> MarkerRemoval {
        let Some(slot) = self.index.get(id).copied() else {
            return MarkerRemoval::default();
        };

        let marker = self.store.markers.remove(slot);
        let before = self.store.links.len();
        self.store.links.retain(|link| !link.touches(id));
        let links_removed = before - self.store.links.len();
        self.reindex();

        log::debug!("removed marker {} and {} link(s)", id, links_removed);
        MarkerRemoval {
            marker: Some(marker),
            links_removed,
        }
    }

    pub fn rename_marker(&mut self, id: &str, name: impl Into<String>) -> Result<&Marker> {
        let marker = self
            .resolve_marker_mut(id)
            .ok_or_else(|| Error::not_found("marker", id))?;
        marker.name = name.into();
        Ok(&*marker)
    }

    pub fn move_marker(&mut self, id: &str, position: usize) -> Result<&Marker> {
        let marker = self
            .resolve_marker_mut(id)
            .ok_or_else(|| Error::not_found("marker", id))?;
        marker.position = position;
        Ok(&*marker)
    }

    /// Markers on one note, ordered by position
    pub fn markers_in_note(&self, note_path: &str) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self
            .store
            .markers
            .iter()
            .filter(|m| m.note_path == note_path)
            .collect();
        markers.sort_by_key(|m| m.position);
        markers
    }

    // === Links ===

    /// Create a link between two existing markers. Self-links are allowed.
    pub fn add_link(&mut self, source_marker_id: &str, target_marker_id: &str) -> Result<Link> {
        for id in [source_marker_id, target_marker_id] {
            if !self.index.contains_key(id) {
                return Err(Error::InvalidReference(id.to_string()));
            }
        }

        let id = util::fresh_id(C::LINK_ID_PREFIX, |id| {
            self.store.links.iter().any(|l| l.id == id)
        });
        let link = Link {
            id,
            source_marker_id: source_marker_id.to_string(),
            target_marker_id: target_marker_id.to_string(),
        };
        self.store.links.push(link.clone());
        log::debug!("added link {} ({} -> {})", link.id, source_marker_id, target_marker_id);
        Ok(link)
    }

    pub fn resolve_link(&self, id: &str) -> Option<&Link> {
        self.store.links.iter().find(|l| l.id == id)
    }

    /// Remove a single link, returning it if it existed
    pub fn remove_link(&mut self, id: &str) -> Option<Link> {
        let pos = self.store.links.iter().position(|l| l.id == id)?;
        Some(self.store.links.remove(pos))
    }

    pub fn links_from(&self, marker_id: &str) -> Vec<&Link> {
        self.store
            .links
            .iter()
            .filter(|l| l.source_marker_id == marker_id)
            .collect()
    }

    pub fn links_to(&self, marker_id: &str) -> Vec<&Link> {
        self.store
            .links
            .iter()
            .filter(|l| l.target_marker_id == marker_id)
            .collect()
    }

    /// Display name of a marker, or "unknown" if it no longer exists
    pub fn marker_label(&self, id: &str) -> &str {
        self.resolve_marker(id)
            .map(|m| m.name.as_str())
            .unwrap_or(C::UNKNOWN_LABEL)
    }

    /// "source -> target" using marker names
    pub fn link_label(&self, link: &Link) -> String {
        format!(
            "{} -> {}",
            self.marker_label(&link.source_marker_id),
            self.marker_label(&link.target_marker_id)
        )
    }

    /// Links with at least one endpoint missing
    pub fn dangling_links(&self) -> Vec<&Link> {
        self.store
            .links
            .iter()
            .filter(|l| {
                !self.index.contains_key(&l.source_marker_id)
                    || !self.index.contains_key(&l.target_marker_id)
            })
            .collect()
    }

    /// Drop every dangling link, returning how many were removed
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.store.links.len();
        let index = &self.index;
        self.store.links.retain(|l| {
            index.contains_key(&l.source_marker_id) && index.contains_key(&l.target_marker_id)
        });
        before - self.store.links.len()
    }

    /// Marker a link jumps to
    pub fn jump_target(&self, link_id: &str) -> Result<&Marker> {
        let link = self
            .resolve_link(link_id)
            .ok_or_else(|| Error::not_found("link", link_id))?;
        self.resolve_marker(&link.target_marker_id)
            .ok_or_else(|| Error::InvalidReference(link.target_marker_id.clone()))
    }

    // === Line bookmarks ===

    pub fn add_bookmark(
        &mut self,
        note_path: impl Into<String>,
        line: usize,
        label: Option<String>,
    ) -> LineBookmark {
        let id = util::fresh_id(C::BOOKMARK_ID_PREFIX, |id| {
            self.store.bookmarks.iter().any(|b| b.id == id)
        });
        let bookmark = LineBookmark {
            id,
            note_path: note_path.into(),
            line,
            label,
        };
        self.store.bookmarks.push(bookmark.clone());
        bookmark
    }

    pub fn remove_bookmark(&mut self, id: &str) -> Option<LineBookmark> {
        let pos = self.store.bookmarks.iter().position(|b| b.id == id)?;
        Some(self.store.bookmarks.remove(pos))
    }

    pub fn bookmarks_in_note(&self, note_path: &str) -> Vec<&LineBookmark> {
        let mut bookmarks: Vec<&LineBookmark> = self
            .store
            .bookmarks
            .iter()
            .filter(|b| b.note_path == note_path)
            .collect();
        bookmarks.sort_by_key(|b| b.line);
        bookmarks
    }

    // === Note repository hooks ===

    /// Remove every marker (with its links) and bookmark on a deleted note
    pub fn remove_markers_for_note(&mut self, note_path: &str) -> NoteCleanup {
        let doomed: HashSet<String> = self
            .store
            .markers
            .iter()
            .filter(|m| m.note_path == note_path)
            .map(|m| m.id.clone())
            .collect();

        let mut cleanup = NoteCleanup::default();
        for id in &doomed {
            let removal = self.remove_marker(id);
            if removal.marker.is_some() {
                cleanup.markers_removed += 1;
            }
            cleanup.links_removed += removal.links_removed;
        }

        let before = self.store.bookmarks.len();
        self.store.bookmarks.retain(|b| b.note_path != note_path);
        cleanup.bookmarks_removed = before - self.store.bookmarks.len();

        if !cleanup.is_empty() {
            log::info!(
                "note {} deleted: dropped {} marker(s), {} link(s), {} bookmark(s)",
                note_path,
                cleanup.markers_removed,
                cleanup.links_removed,
                cleanup.bookmarks_removed
            );
        }
        cleanup
    }

    /// Point every marker and bookmark on `old_path` at `new_path`.
    /// Returns the number of records rewritten.
    pub fn rename_note_references(&mut self, old_path: &str, new_path: &str) -> usize {
        let mut changed = 0;
        for marker in self.store.markers.iter_mut().filter(|m| m.note_path == old_path) {
            marker.note_path = new_path.to_string();
            changed += 1;
        }
        for bookmark in self.store.bookmarks.iter_mut().filter(|b| b.note_path == old_path) {
            bookmark.note_path = new_path.to_string();
            changed += 1;
        }
        if changed > 0 {
            log::info!("note {} renamed to {}: {} reference(s) updated", old_path, new_path, changed);
        }
        changed
    }
}

fn retain_unique<T>(kind: &str, records: &mut Vec<T>, id_of: impl Fn(&T) -> &String) {
    let mut seen = HashSet::new();
    records.retain(|record| {
        let id = id_of(record);
        if id.is_empty() {
            log::warn!("dropping {} without an id from metadata", kind);
            false
        } else if !seen.insert(id.clone()) {
            log::warn!("dropping duplicate {} '{}' from metadata", kind, id);
            false
        } else {
            true
        }
    });
}
