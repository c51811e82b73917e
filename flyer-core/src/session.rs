//! # Session Persistence
//!
//! Saves flyer documents as JSON files in a data directory and loads
//! them back, one file per named session.

use std::path::{Path, PathBuf};

use crate::error::{EditorError, EditorResult};
use crate::schema::FlyerDocument;

/// Default session name used when the caller does not pick one.
pub const DEFAULT_SESSION: &str = "default";

/// Filesystem-backed storage for flyer documents.
///
/// Sessions are stored as `<name>.json` under the data directory, with
/// names sanitized so they stay valid filenames.
#[derive(Debug, Clone)]
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `data_dir`. The directory is created if
    /// it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the directory cannot be
    /// created.
    pub fn new(data_dir: impl Into<PathBuf>) -> EditorResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// The directory sessions are stored in.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Save a document under the given session name, overwriting any
    /// previous save.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, serialization fails or
    /// the file cannot be written.
    pub fn save(&self, name: &str, document: &FlyerDocument) -> EditorResult<()> {
        let path = self.path_for(name)?;
        let json = serde_json::to_string_pretty(document)?;
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!(session = name, path = %path.display(), error = %e, "failed to write session file");
            return Err(e.into());
        }
        tracing::debug!(session = name, path = %path.display(), "session saved");
        Ok(())
    }

    /// Load the document saved under the given session name.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the file does not exist or
    /// cannot be read, and [`EditorError::Serialization`] if it does
    /// not parse.
    pub fn load(&self, name: &str) -> EditorResult<FlyerDocument> {
        let path = self.path_for(name)?;
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(session = name, path = %path.display(), error = %e, "failed to read session file");
                return Err(e.into());
            }
        };
        let document = match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(session = name, error = %e, "failed to parse session file");
                return Err(e.into());
            }
        };
        tracing::debug!(session = name, "session loaded");
        Ok(document)
    }

    /// List the session names saved in the data directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the directory cannot be
    /// read.
    pub fn list(&self) -> EditorResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.data_dir.display(), error = %e, "failed to read session directory");
                return Err(e.into());
            }
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a saved session. Returns `false` if no file existed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the file exists but cannot
    /// be removed.
    pub fn delete(&self, name: &str) -> EditorResult<bool> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!(session = name, path = %path.display(), error = %e, "failed to delete session file");
            return Err(e.into());
        }
        tracing::debug!(session = name, "session deleted");
        Ok(true)
    }

    fn path_for(&self, name: &str) -> EditorResult<PathBuf> {
        let sanitized = sanitize_filename(name);
        if sanitized.is_empty() {
            return Err(EditorError::InvalidOperation(
                "session name is empty".to_string(),
            ));
        }
        Ok(self.data_dir.join(format!("{sanitized}.json")))
    }
}

/// Sanitize a session name for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with
/// `_`.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
