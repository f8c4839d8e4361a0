//! Workspace - the explicitly owned application context
//!
//! Ties the note repository, the marker graph and the navigation history to
//! one configuration. The metadata store is loaded when the workspace opens
//! and saved after every mutating call.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::{MarkerGraph, MarkerRemoval, NoteCleanup};
use crate::history::NavigationHistory;
use crate::model::{LineBookmark, Link, Marker, NavigationEntry};
use crate::preview;
use crate::repository::{NoteRename, NoteRepository};
use crate::store;
use crate::util;

pub struct Workspace {
    config: Config,
    repo: NoteRepository,
    graph: MarkerGraph,
    history: NavigationHistory,
}

impl Workspace {
    /// Open the notes root described by `config`, loading its metadata
    pub fn open(config: Config) -> Self {
        let graph = MarkerGraph::from_store(store::load(&config.metadata_path()));
        log::debug!(
            "opened workspace at {} ({} marker(s), {} link(s))",
            config.root.display(),
            graph.markers().len(),
            graph.links().len()
        );
        Self {
            repo: NoteRepository::new(config.root.clone()),
            config,
            graph,
            history: NavigationHistory::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repo(&self) -> &NoteRepository {
        &self.repo
    }

    pub fn graph(&self) -> &MarkerGraph {
        &self.graph
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.config.metadata_path()
    }

    /// Persist the metadata store
    pub fn save(&self) -> Result<()> {
        store::save(&self.metadata_path(), self.graph.store())
    }

    fn require_note(&self, note_path: &str) -> Result<String> {
        let note_path = util::normalize_note_path(note_path);
        if !self.repo.exists(&note_path) {
            return Err(Error::not_found("note", note_path));
        }
        Ok(note_path)
    }

    fn require_marker(&self, id: &str) -> Result<&Marker> {
        self.graph
            .resolve_marker(id)
            .ok_or_else(|| Error::not_found("marker", id))
    }

    // === Markers, links, bookmarks ===

    pub fn add_marker(&mut self, name: &str, note_path: &str, position: usize) -> Result<Marker> {
        let note_path = self.require_note(note_path)?;
        let marker = self.graph.add_marker(name, note_path, position);
        self.save()?;
        Ok(marker)
    }

    pub fn remove_marker(&mut self, id: &str) -> Result<MarkerRemoval> {
        let removal = self.graph.remove_marker(id);
        if removal.marker.is_some() {
            self.save()?;
        }
        Ok(removal)
    }

    pub fn rename_marker(&mut self, id: &str, name: &str) -> Result<Marker> {
        let marker = self.graph.rename_marker(id, name)?.clone();
        self.save()?;
        Ok(marker)
    }

    pub fn move_marker(&mut self, id: &str, position: usize) -> Result<Marker> {
        let marker = self.graph.move_marker(id, position)?.clone();
        self.save()?;
        Ok(marker)
    }

    pub fn add_link(&mut self, source_marker_id: &str, target_marker_id: &str) -> Result<Link> {
        let link = self.graph.add_link(source_marker_id, target_marker_id)?;
        self.save()?;
        Ok(link)
    }

    pub fn remove_link(&mut self, id: &str) -> Result<Link> {
        let link = self
            .graph
            .remove_link(id)
            .ok_or_else(|| Error::not_found("link", id))?;
        self.save()?;
        Ok(link)
    }

    pub fn prune_dangling_links(&mut self) -> Result<usize> {
        let pruned = self.graph.prune_dangling();
        if pruned > 0 {
            self.save()?;
        }
        Ok(pruned)
    }

    pub fn add_bookmark(
        &mut self,
        note_path: &str,
        line: usize,
        label: Option<String>,
    ) -> Result<LineBookmark> {
        let note_path = self.require_note(note_path)?;
        let bookmark = self.graph.add_bookmark(note_path, line, label);
        self.save()?;
        Ok(bookmark)
    }

    pub fn remove_bookmark(&mut self, id: &str) -> Result<LineBookmark> {
        let bookmark = self
            .graph
            .remove_bookmark(id)
            .ok_or_else(|| Error::not_found("bookmark", id))?;
        self.save()?;
        Ok(bookmark)
    }

    // === Notes (repository + graph hooks) ===

    pub fn create_note(&mut self, category: Option<&str>, title: &str, content: Option<&str>) -> Result<String> {
        let category = category.unwrap_or(&self.config.settings.default_category);
        self.repo.create_note(category, title, content)
    }

    pub fn delete_note(&mut self, note_path: &str) -> Result<NoteCleanup> {
        let note_path = util::normalize_note_path(note_path);
        self.repo.delete_note(&note_path)?;
        self.forget_note(&note_path)
    }

    pub fn rename_note(&mut self, note_path: &str, new_name: &str) -> Result<NoteRename> {
        let rename = self.repo.rename_note(note_path, new_name)?;
        self.apply_renames(std::slice::from_ref(&rename))?;
        Ok(rename)
    }

    pub fn move_note(&mut self, note_path: &str, category: &str) -> Result<NoteRename> {
        let rename = self.repo.move_note(note_path, category)?;
        self.apply_renames(std::slice::from_ref(&rename))?;
        Ok(rename)
    }

    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<Vec<NoteRename>> {
        let renames = self.repo.rename_category(old, new)?;
        self.apply_renames(&renames)?;
        Ok(renames)
    }

    pub fn delete_category(&mut self, name: &str, force: bool) -> Result<NoteCleanup> {
        let deleted = self.repo.delete_category(name, force)?;
        let mut total = NoteCleanup::default();
        for note_path in &deleted {
            let cleanup = self.graph.remove_markers_for_note(note_path);
            self.history.forget_note(note_path);
            total.markers_removed += cleanup.markers_removed;
            total.links_removed += cleanup.links_removed;
            total.bookmarks_removed += cleanup.bookmarks_removed;
        }
        if !total.is_empty() {
            self.save()?;
        }
        Ok(total)
    }

    fn forget_note(&mut self, note_path: &str) -> Result<NoteCleanup> {
        let cleanup = self.graph.remove_markers_for_note(note_path);
        self.history.forget_note(note_path);
        if !cleanup.is_empty() {
            self.save()?;
        }
        Ok(cleanup)
    }

    fn apply_renames(&mut self, renames: &[NoteRename]) -> Result<()> {
        let mut changed = 0;
        for rename in renames {
            changed += self
                .graph
                .rename_note_references(&rename.old_path, &rename.new_path);
            self.history.rename_note(&rename.old_path, &rename.new_path);
        }
        if changed > 0 {
            self.save()?;
        }
        Ok(())
    }

    /// HTML preview of a note with its marker anchors
    pub fn render_note(&self, note_path: &str) -> Result<String> {
        let note_path = util::normalize_note_path(note_path);
        let content = self.repo.read_note(&note_path)?;
        let markers = self.graph.markers_in_note(&note_path);
        Ok(preview::render_html(
            &content,
            &markers,
            &self.config.settings.preview_marker_class,
        ))
    }

    // === Navigation ===

    /// Follow a link from the current position, returning the target marker
    pub fn jump(&mut self, link_id: &str, from_note: &str, from_position: usize) -> Result<Marker> {
        let target = self.graph.jump_target(link_id)?.clone();
        self.history.push_current(from_note, from_position);
        log::debug!("jump via {} to {}:{}", link_id, target.note_path, target.position);
        Ok(target)
    }

    /// Jump straight to a marker from the current position
    pub fn jump_to_marker(
        &mut self,
        marker_id: &str,
        from_note: &str,
        from_position: usize,
    ) -> Result<Marker> {
        let target = self.require_marker(marker_id)?.clone();
        self.history.push_current(from_note, from_position);
        Ok(target)
    }

    /// Return to where the last jump started, if anywhere
    pub fn back(&mut self) -> Option<NavigationEntry> {
        self.history.back()
    }

    /// Forget every recorded position
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let temp_dir = TempDir::new().unwrap();
        let ws = Workspace::open(Config::with_root(temp_dir.path()));
        (temp_dir, ws)
    }

    fn reopen(temp_dir: &TempDir) -> Workspace {
        Workspace::open(Config::with_root(temp_dir.path()))
    }

    #[test]
    fn test_mutations_are_persisted() {
        let (temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let y = ws.create_note(Some("cat"), "y", None).unwrap();

        let a = ws.add_marker("A", &x, 10).unwrap();
        let b = ws.add_marker("B", &y, 0).unwrap();
        let l = ws.add_link(&a.id, &b.id).unwrap();

        let reopened = reopen(&temp_dir);
        assert_eq!(reopened.graph().markers(), &[a, b]);
        assert_eq!(reopened.graph().links(), &[l]);
    }

    #[test]
    fn test_add_marker_requires_note() {
        let (_temp_dir, mut ws) = workspace();
        assert!(matches!(
            ws.add_marker("A", "cat/missing.md", 0),
            Err(Error::NotFound { .. })
        ));
        assert!(ws.graph().markers().is_empty());
    }

    #[test]
    fn test_add_link_invalid_reference_not_saved() {
        let (temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let a = ws.add_marker("A", &x, 0).unwrap();

        assert!(matches!(ws.add_link(&a.id, "ghost"), Err(Error::InvalidReference(_))));
        assert!(reopen(&temp_dir).graph().links().is_empty());
    }

    #[test]
    fn test_delete_note_cascades_and_persists() {
        let (temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let y = ws.create_note(Some("cat"), "y", None).unwrap();
        let a = ws.add_marker("A", &x, 10).unwrap();
        let b = ws.add_marker("B", &y, 0).unwrap();
        ws.add_link(&a.id, &b.id).unwrap();
        ws.add_bookmark(&x, 2, None).unwrap();

        let cleanup = ws.delete_note(&x).unwrap();

        assert_eq!(cleanup.markers_removed, 1);
        assert_eq!(cleanup.links_removed, 1);
        assert_eq!(cleanup.bookmarks_removed, 1);

        let reopened = reopen(&temp_dir);
        assert_eq!(reopened.graph().markers(), &[b]);
        assert!(reopened.graph().links().is_empty());
        assert!(reopened.graph().bookmarks().is_empty());
    }

    #[test]
    fn test_rename_note_rewrites_references() {
        let (temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let a = ws.add_marker("A", &x, 3).unwrap();

        let rename = ws.rename_note(&x, "Renamed").unwrap();
        assert_eq!(rename.new_path, "cat/renamed.md");

        let reopened = reopen(&temp_dir);
        let marker = reopened.graph().resolve_marker(&a.id).unwrap();
        assert_eq!(marker.note_path, "cat/renamed.md");
        assert_eq!(marker.position, 3);
    }

    #[test]
    fn test_rename_and_delete_category() {
        let (temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("old"), "x", None).unwrap();
        let a = ws.add_marker("A", &x, 0).unwrap();

        ws.rename_category("old", "new").unwrap();
        assert_eq!(ws.graph().resolve_marker(&a.id).unwrap().note_path, "new/x.md");

        let cleanup = ws.delete_category("new", true).unwrap();
        assert_eq!(cleanup.markers_removed, 1);
        assert!(reopen(&temp_dir).graph().markers().is_empty());
    }

    #[test]
    fn test_jump_and_back() {
        let (_temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("cat"), "x", None).unwrap();
        let y = ws.create_note(Some("cat"), "y", None).unwrap();
        let a = ws.add_marker("A", &x, 10).unwrap();
        let b = ws.add_marker("B", &y, 4).unwrap();
        let l = ws.add_link(&a.id, &b.id).unwrap();

        assert!(ws.back().is_none());

        let target = ws.jump(&l.id, &x, 12).unwrap();
        assert_eq!(target, b);

        let entry = ws.back().unwrap();
        assert_eq!(entry, NavigationEntry::new(x.clone(), 12));
        assert!(ws.back().is_none());
    }

    #[test]
    fn test_jump_over_dangling_link_does_not_push() {
        let (_temp_dir, mut ws) = workspace();
        assert!(matches!(ws.jump("nope", "cat/x.md", 0), Err(Error::NotFound { .. })));
        assert!(ws.history().is_empty());
    }

    #[test]
    fn test_render_note_has_marker_anchors() {
        let (_temp_dir, mut ws) = workspace();
        let x = ws.create_note(Some("cat"), "x", Some("# X\n\nbody text\n")).unwrap();
        let a = ws.add_marker("A", &x, 0).unwrap();
        let b = ws.add_marker("B", &x, 9).unwrap();

        let html = ws.render_note(&x).unwrap();
        assert!(html.contains("<h1>X</h1>"));
        assert!(html.contains(&format!("<span class=\"marker\" id=\"marker-{}\"", a.id)));
        assert!(html.contains(&format!("<p>body<span class=\"marker\" id=\"marker-{}\"", b.id)));
        assert!(!html.contains("&lt;span"));
    }

    #[test]
    fn test_open_with_corrupt_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_root(temp_dir.path());
        fs::write(config.metadata_path(), "garbage").unwrap();

        let ws = Workspace::open(config);

        assert!(ws.graph().markers().is_empty());
        assert!(store::quarantine_path(&ws.metadata_path()).exists());
    }

    #[test]
    fn test_open_drops_unusable_records_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_root(temp_dir.path());
        fs::write(
            config.metadata_path(),
            r#"{"markers":[{"id":"m1","name":"A","notePath":"c/a.md"},{"name":"no id"},{"id":"m1","name":"again"}]}"#,
        )
        .unwrap();

        let ws = Workspace::open(config);

        assert_eq!(ws.graph().markers().len(), 1);
        assert_eq!(ws.graph().resolve_marker("m1").map(|m| m.name.as_str()), Some("A"));
    }

    #[test]
    fn test_create_note_default_category() {
        let (_temp_dir, mut ws) = workspace();
        let id = ws.create_note(None, "Quick", None).unwrap();
        assert_eq!(id, "inbox/quick.md");
    }
}
