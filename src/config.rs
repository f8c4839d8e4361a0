//! Configuration resolution
//!
//! The notes root is chosen with this priority:
//! - `--home` command-line flag
//! - `MARKNOTE_HOME` environment variable
//! - `~/.marknote`
//!
//! An optional `marknote.yaml` inside the root tunes the rest. Missing keys
//! fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants as C;
use crate::error::Result;
use crate::util;

/// Settings read from `marknote.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Metadata sidecar file name, relative to the notes root
    pub metadata_file: String,
    /// Category used when a note is created without one
    pub default_category: String,
    /// CSS class of marker anchors in the HTML preview
    pub preview_marker_class: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metadata_file: C::DEFAULT_METADATA_FILE.to_string(),
            default_category: C::DEFAULT_CATEGORY.to_string(),
            preview_marker_class: C::DEFAULT_MARKER_CLASS.to_string(),
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding category folders
    pub root: PathBuf,
    pub settings: Settings,
}

impl Config {
    /// Resolve the root from the flag/env/home chain and read its settings file
    pub fn resolve(home_override: Option<&str>) -> Result<Self> {
        Self::load(notes_path(home_override))
    }

    /// Use `root` directly and read its settings file if present
    pub fn load(root: PathBuf) -> Result<Self> {
        let root = if root.exists() {
            dunce::canonicalize(&root).unwrap_or(root)
        } else {
            root
        };

        let settings_path = root.join(C::CONFIG_FILENAME);
        let settings = if settings_path.is_file() {
            let content = fs::read_to_string(&settings_path)?;
            if content.trim().is_empty() {
                Settings::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            Settings::default()
        };

        // The sidecar must stay inside the notes root
        util::secure_path(&root, &settings.metadata_file)?;

        log::debug!("notes root: {}", root.display());
        Ok(Self { root, settings })
    }

    /// Config with default settings, without touching the filesystem
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings: Settings::default(),
        }
    }

    /// Absolute path of the metadata sidecar
    pub fn metadata_path(&self) -> PathBuf {
        util::secure_path(&self.root, &self.settings.metadata_file)
            .unwrap_or_else(|_| self.root.join(C::DEFAULT_METADATA_FILE))
    }
}

/// Get the default notes directory path in user's home directory
pub fn default_notes_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(C::DEFAULT_NOTES_DIR))
}

/// Resolve the notes root directory
pub fn notes_path(home_override: Option<&str>) -> PathBuf {
    if let Some(home) = home_override {
        return PathBuf::from(home);
    }

    if let Some(home) = std::env::var(C::ENV_HOME).ok().filter(|s| !s.is_empty()) {
        return PathBuf::from(home);
    }

    default_notes_path().unwrap_or_else(|| Path::new(C::DEFAULT_NOTES_DIR).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_notes_path_override_wins() {
        assert_eq!(notes_path(Some("/tmp/notes")), PathBuf::from("/tmp/notes"));
    }

    #[test]
    fn test_load_without_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(config.settings, Settings::default());
        assert!(config.metadata_path().ends_with(C::DEFAULT_METADATA_FILE));
    }

    #[test]
    fn test_load_partial_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(C::CONFIG_FILENAME),
            "metadata_file: meta.json\nunknown_key: 1\n",
        )
        .unwrap();

        let config = Config::load(temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(config.settings.metadata_file, "meta.json");
        assert_eq!(config.settings.default_category, C::DEFAULT_CATEGORY);
        assert_eq!(config.metadata_path(), config.root.join("meta.json"));
    }

    #[test]
    fn test_load_invalid_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(C::CONFIG_FILENAME), "metadata_file: [1, 2").unwrap();

        assert!(Config::load(temp_dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_metadata_file_outside_root_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(C::CONFIG_FILENAME),
            "metadata_file: ../outside.json\n",
        )
        .unwrap();

        assert!(matches!(
            Config::load(temp_dir.path().to_path_buf()),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_absolute_metadata_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(C::CONFIG_FILENAME),
            "metadata_file: /tmp/meta.json\n",
        )
        .unwrap();

        assert!(matches!(
            Config::load(temp_dir.path().to_path_buf()),
            Err(Error::InvalidPath(_))
        ));
    }
}
