//! NoteRepository - category folders of Markdown notes
//!
//! The notes root holds one directory per category, each containing `*.md`
//! notes. A note is identified by `"<category>/<file>.md"`. Hidden entries
//! are ignored. The repository never touches marker metadata; callers apply
//! the graph hooks after a rename or delete.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::constants as C;
use crate::error::{Error, Result};
use crate::util;

/// Category names: no path separators, not hidden
static CATEGORY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^./\\][^/\\]*$").expect("static regex is valid"));

/// A content search match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub note_path: String,
    /// 1-based line number
    pub line: usize,
    pub text: String,
}

/// A note rename or move, as old and new identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRename {
    pub old_path: String,
    pub new_path: String,
}

/// Flat-file store of category folders
#[derive(Debug, Clone)]
pub struct NoteRepository {
    root: PathBuf,
}

impl NoteRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a note, validated to stay inside the root
    pub fn note_file(&self, note_path: &str) -> Result<PathBuf> {
        let (category, file) = split_note_path(note_path)?;
        util::secure_path(&self.root, &format!("{}/{}", category, file))
    }

    fn category_dir(&self, name: &str) -> Result<PathBuf> {
        validate_category(name)?;
        util::secure_path(&self.root, name)
    }

    pub fn exists(&self, note_path: &str) -> bool {
        self.note_file(note_path).map(|p| p.is_file()).unwrap_or(false)
    }

    // === Categories ===

    pub fn list_categories(&self) -> Result<Vec<String>> {
        let mut categories = Vec::new();
        if !self.root.exists() {
            return Ok(categories);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            categories.push(name);
        }

        categories.sort();
        Ok(categories)
    }

    pub fn create_category(&self, name: &str) -> Result<PathBuf> {
        let dir = self.category_dir(name)?;
        if dir.exists() {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        fs::create_dir_all(&dir)?;
        log::info!("created category {}", name);
        Ok(dir)
    }

    fn ensure_category(&self, name: &str) -> Result<PathBuf> {
        let dir = self.category_dir(name)?;
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Rename a category folder. Returns one record per contained note.
    pub fn rename_category(&self, old: &str, new: &str) -> Result<Vec<NoteRename>> {
        let old_dir = self.category_dir(old)?;
        let new_dir = self.category_dir(new)?;
        if !old_dir.is_dir() {
            return Err(Error::not_found("category", old));
        }
        if new_dir.exists() {
            return Err(Error::AlreadyExists(new.to_string()));
        }

        let renames = self
            .list_notes(old)?
            .into_iter()
            .map(|old_path| {
                let file = old_path.rsplit('/').next().unwrap_or_default().to_string();
                NoteRename {
                    new_path: format!("{}/{}", new, file),
                    old_path,
                }
            })
            .collect();

        fs::rename(&old_dir, &new_dir)?;
        log::info!("renamed category {} to {}", old, new);
        Ok(renames)
    }

    /// Delete a category folder. Refuses a category holding notes unless
    /// `force` is set. Returns the identifiers of the deleted notes.
    pub fn delete_category(&self, name: &str, force: bool) -> Result<Vec<String>> {
        let dir = self.category_dir(name)?;
        if !dir.is_dir() {
            return Err(Error::not_found("category", name));
        }

        let notes = self.list_notes(name)?;
        if !notes.is_empty() && !force {
            return Err(Error::NotEmpty(name.to_string()));
        }

        fs::remove_dir_all(&dir)?;
        log::info!("deleted category {} ({} note(s))", name, notes.len());
        Ok(notes)
    }

    // === Notes ===

    /// Note identifiers in one category, sorted
    pub fn list_notes(&self, category: &str) -> Result<Vec<String>> {
        let dir = self.category_dir(category)?;
        if !dir.is_dir() {
            return Err(Error::not_found("category", category));
        }

        let mut notes = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(C::MARKDOWN_EXT) {
                continue;
            }
            notes.push(format!("{}/{}", category, name));
        }

        notes.sort();
        Ok(notes)
    }

    /// Every note in every category
    pub fn list_all_notes(&self) -> Result<Vec<String>> {
        let mut notes = Vec::new();
        for category in self.list_categories()? {
            notes.extend(self.list_notes(&category)?);
        }
        Ok(notes)
    }

    /// Create a note named after its title. The category is created on demand.
    pub fn create_note(&self, category: &str, title: &str, content: Option<&str>) -> Result<String> {
        let dir = self.ensure_category(category)?;
        let file = note_file_name(title);
        let note_path = format!("{}/{}", category, file);
        let path = dir.join(&file);

        if path.exists() {
            return Err(Error::AlreadyExists(note_path));
        }

        let body = match content {
            Some(c) => c.to_string(),
            None => format!("# {}\n\n", title.trim()),
        };
        fs::write(&path, body)?;
        log::info!("created note {}", note_path);
        Ok(note_path)
    }

    pub fn read_note(&self, note_path: &str) -> Result<String> {
        let path = self.existing_note(note_path)?;
        Ok(fs::read_to_string(path)?)
    }

    pub fn write_note(&self, note_path: &str, content: &str) -> Result<()> {
        let path = self.existing_note(note_path)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn existing_note(&self, note_path: &str) -> Result<PathBuf> {
        let path = self.note_file(note_path)?;
        if !path.is_file() {
            return Err(Error::not_found("note", note_path));
        }
        Ok(path)
    }

    /// Rename a note. `new_name` is either a full `category/file.md`
    /// identifier or a title, which keeps the note in its category.
    pub fn rename_note(&self, note_path: &str, new_name: &str) -> Result<NoteRename> {
        let (category, _) = split_note_path(note_path)?;
        let new_path = if new_name.contains('/') || new_name.contains('\\') {
            util::normalize_note_path(new_name)
        } else {
            format!("{}/{}", category, note_file_name(new_name))
        };
        self.relocate(note_path, new_path)
    }

    /// Move a note into another existing category, keeping its file name
    pub fn move_note(&self, note_path: &str, category: &str) -> Result<NoteRename> {
        let (_, file) = split_note_path(note_path)?;
        if !self.category_dir(category)?.is_dir() {
            return Err(Error::not_found("category", category));
        }
        self.relocate(note_path, format!("{}/{}", category, file))
    }

    fn relocate(&self, old_path: &str, new_path: String) -> Result<NoteRename> {
        let from = self.existing_note(old_path)?;
        let (new_category, _) = split_note_path(&new_path)?;
        let to = self.note_file(&new_path)?;

        if to.exists() {
            return Err(Error::AlreadyExists(new_path));
        }
        self.ensure_category(new_category)?;
        fs::rename(&from, &to)?;

        log::info!("renamed note {} to {}", old_path, new_path);
        Ok(NoteRename {
            old_path: util::normalize_note_path(old_path),
            new_path,
        })
    }

    pub fn delete_note(&self, note_path: &str) -> Result<()> {
        let path = self.existing_note(note_path)?;
        fs::remove_file(path)?;
        log::info!("deleted note {}", note_path);
        Ok(())
    }

    /// Regex search over the content of every note
    pub fn search(&self, pattern: &str) -> Result<Vec<SearchHit>> {
        let re = Regex::new(pattern)?;
        let mut hits = Vec::new();

        for note_path in self.list_all_notes()? {
            let content = match self.read_note(&note_path) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("skipping {}: {}", note_path, e);
                    continue;
                }
            };
            for (i, line) in content.lines().enumerate() {
                if re.is_match(line) {
                    hits.push(SearchHit {
                        note_path: note_path.clone(),
                        line: i + 1,
                        text: line.to_string(),
                    });
                }
            }
        }

        Ok(hits)
    }
}

fn validate_category(name: &str) -> Result<()> {
    if CATEGORY_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidPath(format!("invalid category name '{}'", name)))
    }
}

/// Split `category/file.md` into its two parts
fn split_note_path(note_path: &str) -> Result<(&str, &str)> {
    let trimmed = note_path.trim_start_matches("./");
    let (category, file) = trimmed
        .split_once(|c| c == '/' || c == '\\')
        .ok_or_else(|| Error::InvalidPath(format!("'{}' is not <category>/<note>.md", note_path)))?;

    validate_category(category)?;
    if file.is_empty()
        || file.starts_with('.')
        || file.contains(|c| c == '/' || c == '\\')
        || !file.ends_with(C::MARKDOWN_EXTENSION)
    {
        return Err(Error::InvalidPath(format!(
            "'{}' is not <category>/<note>.md",
            note_path
        )));
    }
    Ok((category, file))
}

/// File name for a note title: slug plus `.md`, or the title itself if it
/// already names a markdown file
fn note_file_name(title: &str) -> String {
    let title = title.trim();
    if let Some(stem) = title.strip_suffix(C::MARKDOWN_EXTENSION) {
        let slug = util::slugify(stem);
        if !slug.is_empty() {
            return format!("{}{}", slug, C::MARKDOWN_EXTENSION);
        }
    }

    let slug = util::slugify(title);
    if slug.is_empty() {
        format!("{}{}", C::UNTITLED_NOTE_TITLE.to_lowercase(), C::MARKDOWN_EXTENSION)
    } else {
        format!("{}{}", slug, C::MARKDOWN_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo() -> (TempDir, NoteRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = NoteRepository::new(temp_dir.path());
        (temp_dir, repo)
    }

    #[test]
    fn test_categories() {
        let (temp_dir, repo) = repo();
        repo.create_category("work").unwrap();
        repo.create_category("home").unwrap();
        fs::create_dir(temp_dir.path().join(".hidden")).unwrap();
        fs::write(temp_dir.path().join(C::DEFAULT_METADATA_FILE), "{}").unwrap();

        assert_eq!(repo.list_categories().unwrap(), vec!["home", "work"]);
        assert!(matches!(repo.create_category("work"), Err(Error::AlreadyExists(_))));
        assert!(repo.create_category("../escape").is_err());
        assert!(repo.create_category(".secret").is_err());
    }

    #[test]
    fn test_create_and_read_note() {
        let (_temp_dir, repo) = repo();

        let id = repo.create_note("work", "Project Plan", None).unwrap();
        assert_eq!(id, "work/project-plan.md");
        assert_eq!(repo.read_note(&id).unwrap(), "# Project Plan\n\n");

        repo.write_note(&id, "updated").unwrap();
        assert_eq!(repo.read_note(&id).unwrap(), "updated");

        assert!(matches!(
            repo.create_note("work", "Project Plan", Some("x")),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_list_notes_only_markdown() {
        let (temp_dir, repo) = repo();
        repo.create_note("work", "b", Some("")).unwrap();
        repo.create_note("work", "a", Some("")).unwrap();
        fs::write(temp_dir.path().join("work/image.png"), "").unwrap();
        fs::write(temp_dir.path().join("work/.draft.md"), "").unwrap();

        assert_eq!(repo.list_notes("work").unwrap(), vec!["work/a.md", "work/b.md"]);
        assert!(matches!(repo.list_notes("nope"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_rename_note_by_title_and_path() {
        let (_temp_dir, repo) = repo();
        let id = repo.create_note("work", "Draft", Some("text")).unwrap();

        let rename = repo.rename_note(&id, "Final Version").unwrap();
        assert_eq!(rename.old_path, "work/draft.md");
        assert_eq!(rename.new_path, "work/final-version.md");
        assert!(!repo.exists(&id));

        let rename = repo.rename_note(&rename.new_path, "archive/final.md").unwrap();
        assert_eq!(rename.new_path, "archive/final.md");
        assert_eq!(repo.read_note("archive/final.md").unwrap(), "text");
    }

    #[test]
    fn test_rename_note_conflict() {
        let (_temp_dir, repo) = repo();
        let a = repo.create_note("work", "A", None).unwrap();
        repo.create_note("work", "B", None).unwrap();

        assert!(matches!(repo.rename_note(&a, "B"), Err(Error::AlreadyExists(_))));
        assert!(repo.exists(&a));
    }

    #[test]
    fn test_move_note() {
        let (_temp_dir, repo) = repo();
        let id = repo.create_note("work", "Idea", None).unwrap();

        assert!(matches!(repo.move_note(&id, "later"), Err(Error::NotFound { .. })));

        repo.create_category("later").unwrap();
        let rename = repo.move_note(&id, "later").unwrap();
        assert_eq!(rename.new_path, "later/idea.md");
        assert!(repo.exists("later/idea.md"));
    }

    #[test]
    fn test_delete_note() {
        let (_temp_dir, repo) = repo();
        let id = repo.create_note("work", "Gone", None).unwrap();

        repo.delete_note(&id).unwrap();
        assert!(!repo.exists(&id));
        assert!(matches!(repo.delete_note(&id), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_delete_category() {
        let (_temp_dir, repo) = repo();
        repo.create_note("old", "One", None).unwrap();
        repo.create_category("empty").unwrap();

        assert!(matches!(repo.delete_category("old", false), Err(Error::NotEmpty(_))));
        assert_eq!(repo.delete_category("empty", false).unwrap(), Vec::<String>::new());
        assert_eq!(repo.delete_category("old", true).unwrap(), vec!["old/one.md"]);
        assert!(repo.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_rename_category() {
        let (_temp_dir, repo) = repo();
        repo.create_note("old", "One", None).unwrap();
        repo.create_note("old", "Two", None).unwrap();

        let renames = repo.rename_category("old", "new").unwrap();

        assert_eq!(renames.len(), 2);
        assert_eq!(renames[0].old_path, "old/one.md");
        assert_eq!(renames[0].new_path, "new/one.md");
        assert!(repo.exists("new/two.md"));
    }

    #[test]
    fn test_invalid_note_paths() {
        let (_temp_dir, repo) = repo();
        assert!(repo.read_note("no-category.md").is_err());
        assert!(repo.read_note("cat/../../etc/passwd.md").is_err());
        assert!(repo.read_note("cat/note.txt").is_err());
        assert!(repo.read_note("/abs/note.md").is_err());
    }

    #[test]
    fn test_search() {
        let (_temp_dir, repo) = repo();
        repo.create_note("work", "A", Some("alpha\nneedle here\n")).unwrap();
        repo.create_note("home", "B", Some("Needle\n")).unwrap();

        let hits = repo.search("(?i)needle").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].note_path, "home/b.md");
        assert_eq!(hits[1].line, 2);

        assert!(matches!(repo.search("("), Err(Error::Regex(_))));
    }

    #[test]
    fn test_note_file_name() {
        assert_eq!(note_file_name("Hello World"), "hello-world.md");
        assert_eq!(note_file_name("already.md"), "already.md");
        assert_eq!(note_file_name("!!!"), "untitled.md");
    }
}
