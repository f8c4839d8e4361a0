//! Metadata store - JSON sidecar persistence
//!
//! The sidecar holds three ordered record lists: markers, links and line
//! bookmarks. Parsing is tolerant: unknown fields are ignored and missing
//! lists default to empty.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants as C;
use crate::error::{Error, Result};
use crate::model::{LineBookmark, Link, Marker};

/// The persisted aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataStore {
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub bookmarks: Vec<LineBookmark>,
}

impl MetadataStore {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.links.is_empty() && self.bookmarks.is_empty()
    }
}

/// Load the store, falling back to an empty one on any failure.
///
/// A file that exists but cannot be parsed is copied to `<file>.corrupt`
/// first, so the next save does not destroy the only copy.
pub fn load(path: &Path) -> MetadataStore {
    match try_load(path) {
        Ok(store) => store,
        Err(Error::Persistence { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::debug!("no metadata file at {}, starting empty", path.display());
            MetadataStore::default()
        }
        Err(e) => {
            log::warn!("{}; starting with empty metadata", e);
            if path.is_file() {
                let backup = quarantine_path(path);
                match fs::copy(path, &backup) {
                    Ok(_) => log::warn!("unreadable metadata kept at {}", backup.display()),
                    Err(copy_err) => log::warn!(
                        "could not keep unreadable metadata at {}: {}",
                        backup.display(),
                        copy_err
                    ),
                }
            }
            MetadataStore::default()
        }
    }
}

/// Load the store, reporting every failure (including a missing file)
pub fn try_load(path: &Path) -> Result<MetadataStore> {
    let content = fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
    if content.trim().is_empty() {
        return Ok(MetadataStore::default());
    }
    serde_json::from_str(&content)
        .map_err(|e| Error::persistence(path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Save the store by writing a sibling temp file and renaming it into place
pub fn save(path: &Path, store: &MetadataStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    let tmp = sibling_with_suffix(path, C::TEMP_SUFFIX);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::persistence(path, e))?;
    }

    if let Err(e) = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::persistence(path, e));
    }

    log::debug!(
        "saved {} marker(s), {} link(s), {} bookmark(s) to {}",
        store.markers.len(),
        store.links.len(),
        store.bookmarks.len(),
        path.display()
    );
    Ok(())
}

/// Where an unparseable metadata file is copied aside
pub fn quarantine_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, C::CORRUPT_SUFFIX)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> MetadataStore {
        MetadataStore {
            markers: vec![
                Marker {
                    id: "m1".to_string(),
                    name: "Intro".to_string(),
                    note_path: "cat/x.md".to_string(),
                    position: 10,
                },
                Marker {
                    id: "m2".to_string(),
                    name: "Details".to_string(),
                    note_path: "cat/y.md".to_string(),
                    position: 0,
                },
            ],
            links: vec![Link {
                id: "l1".to_string(),
                source_marker_id: "m1".to_string(),
                target_marker_id: "m2".to_string(),
            }],
            bookmarks: vec![LineBookmark {
                id: "b1".to_string(),
                note_path: "cat/x.md".to_string(),
                line: 3,
                label: Some("todo".to_string()),
            }],
        }
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");

        let store = sample_store();
        save(&path, &store).unwrap();

        assert_eq!(load(&path), store);
        assert!(!sibling_with_suffix(&path, C::TEMP_SUFFIX).exists());
    }

    #[test]
    fn test_save_then_load_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");

        save(&path, &MetadataStore::default()).unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        assert!(load(&path).is_empty());
        assert!(!quarantine_path(&path).exists());
        assert!(matches!(try_load(&path), Err(Error::Persistence { .. })));
    }

    #[test]
    fn test_load_corrupt_file_is_quarantined() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load(&path).is_empty());

        let backup = quarantine_path(&path);
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
        // Original is left alone until the caller saves
        assert!(path.exists());
    }

    #[test]
    fn test_tolerant_parsing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");
        fs::write(
            &path,
            r#"{"markers":[{"id":"m1","name":"A","notePath":"c/a.md","position":4,"color":"red"}],"version":2}"#,
        )
        .unwrap();

        let store = try_load(&path).unwrap();
        assert_eq!(store.markers.len(), 1);
        assert_eq!(store.markers[0].note_path, "c/a.md");
        assert!(store.links.is_empty());
        assert!(store.bookmarks.is_empty());
    }

    #[test]
    fn test_record_without_id_keeps_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");
        fs::write(
            &path,
            r#"{"markers":[{"id":"m1","name":"A","notePath":"c/a.md","position":4},{"name":"B","notePath":"c/a.md"}],"links":[{"sourceMarkerId":"m1","targetMarkerId":"m1"}]}"#,
        )
        .unwrap();

        let store = load(&path);
        assert_eq!(store.markers.len(), 2);
        assert_eq!(store.markers[0].id, "m1");
        assert!(store.markers[1].id.is_empty());
        assert_eq!(store.links.len(), 1);
        assert!(!quarantine_path(&path).exists());
    }

    #[test]
    fn test_camel_case_field_names() {
        let json = serde_json::to_string(&sample_store()).unwrap();
        assert!(json.contains("\"notePath\""));
        assert!(json.contains("\"sourceMarkerId\""));
        assert!(json.contains("\"targetMarkerId\""));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");
        save(&path, &sample_store()).unwrap();

        // A directory in the temp file's place makes the write fail
        fs::create_dir(sibling_with_suffix(&path, C::TEMP_SUFFIX)).unwrap();
        let result = save(&path, &MetadataStore::default());

        assert!(matches!(result, Err(Error::Persistence { .. })));
        assert_eq!(load(&path), sample_store());
    }
}
