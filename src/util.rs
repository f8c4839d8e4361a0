//! Utility functions for secure path handling, id generation and text offsets

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::constants as C;
use crate::error::{Error, Result};

/// Validate and resolve a note path, ensuring it stays within the notes root
/// Returns an error if the path attempts to escape the base directory
pub fn secure_path(base: &Path, relative: &str) -> Result<PathBuf> {
    let mut result = base.to_path_buf();

    for component in relative.split(|c| c == '/' || c == '\\') {
        match component {
            "" | "." => continue,
            ".." => {
                if result == base {
                    return Err(Error::InvalidPath(format!(
                        "'{}' escapes the notes directory",
                        relative
                    )));
                }
                result.pop();
            }
            _ => {
                // Windows drive prefix such as "C:"
                if component.len() >= 2 && component.as_bytes()[1] == b':' {
                    return Err(Error::InvalidPath(format!(
                        "absolute paths are not allowed: '{}'",
                        relative
                    )));
                }
                result.push(component);
            }
        }
    }

    if relative.starts_with('/') || relative.starts_with('\\') {
        return Err(Error::InvalidPath(format!(
            "absolute paths are not allowed: '{}'",
            relative
        )));
    }

    // Existing paths are canonicalised so symlinks cannot point outside the root
    if base.exists() && result.exists() {
        let canonical_base = dunce::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        let canonical_result = dunce::canonicalize(&result).unwrap_or_else(|_| result.clone());
        if !canonical_result.starts_with(&canonical_base) {
            return Err(Error::InvalidPath(format!(
                "'{}' resolves outside the notes directory",
                relative
            )));
        }
    } else if !result.starts_with(base) {
        return Err(Error::InvalidPath(format!(
            "'{}' escapes the notes directory",
            relative
        )));
    }

    Ok(result)
}

/// Normalise a note identifier to forward slashes without leading "./" or "/"
pub fn normalize_note_path(note_path: &str) -> String {
    note_path
        .split(|c| c == '/' || c == '\\')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Convert title to URL-safe slug
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_is_dash = false;

    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            result.push(c);
            prev_is_dash = false;
        } else if !prev_is_dash && !result.is_empty() {
            result.push('-');
            prev_is_dash = true;
        }
    }

    result.trim_matches('-').to_string()
}

/// Display a path with forward slashes (cross-platform standard)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Generate an id of the form `<prefix><timestamp>` that `taken` rejects
/// neither for the base form nor, on collision, for `<base>-<n>`
pub fn fresh_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}{}", prefix, Local::now().format(C::ID_TIMESTAMP_FORMAT));
    if !taken(&base) {
        return base;
    }

    let mut n = 2usize;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Byte index of the character at `offset`, clamped to the end of `text`
pub fn char_to_byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// 1-based line number containing the character at `offset`
pub fn line_of_offset(text: &str, offset: usize) -> usize {
    let byte = char_to_byte_offset(text, offset);
    text[..byte].matches('\n').count() + 1
}
