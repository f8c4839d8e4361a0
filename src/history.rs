//! Navigation history - the back-stack of positions left by jumps

use crate::model::NavigationEntry;

/// LIFO stack of places the user jumped away from.
///
/// There is no forward stack: a popped entry is gone, and going back does not
/// push anything.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<NavigationEntry>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current position; call right before performing a jump
    pub fn push_current(&mut self, note_path: impl Into<String>, position: usize) {
        let entry = NavigationEntry::new(note_path, position);
        log::trace!("history push {}:{}", entry.note_path, entry.position);
        self.entries.push(entry);
    }

    /// Pop the most recent entry, if any
    pub fn back(&mut self) -> Option<NavigationEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&NavigationEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from most recent to oldest
    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter().rev()
    }

    /// Drop entries pointing into a deleted note
    pub fn forget_note(&mut self, note_path: &str) {
        self.entries.retain(|e| e.note_path != note_path);
    }

    /// Repoint entries after a note rename
    pub fn rename_note(&mut self, old_path: &str, new_path: &str) {
        for entry in self.entries.iter_mut().filter(|e| e.note_path == old_path) {
            entry.note_path = new_path.to_string();
        }
    }
}
