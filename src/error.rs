//! Error type shared by the library and the command-line front end

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by marknote operations
#[derive(Debug, Error)]
pub enum Error {
    /// A marker, link, bookmark, note or category id did not resolve
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A link endpoint names a marker that does not exist
    #[error("invalid reference: marker '{0}' does not exist, reselect the marker")]
    InvalidReference(String),

    /// The metadata sidecar could not be read, parsed or written
    #[error("metadata file {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A note or category identifier is malformed or escapes the notes root
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("category '{0}' is not empty (use --force)")]
    NotEmpty(String),

    /// Bad session input or a failed check, reported verbatim
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound { kind, id: id.into() }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Persistence { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
