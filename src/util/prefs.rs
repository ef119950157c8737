//! JSON file helpers for durable client preferences.
//!
//! SYSTEM CONTEXT
//! ==============
//! Centralizes read/write of small JSON documents so callers never repeat
//! filesystem glue. Reads are forgiving (absent or corrupt files yield
//! `None`); writes report failures so the caller can surface them.

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to write preferences to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load a JSON value from `path`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "preferences unreadable; using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "preferences corrupt; using defaults");
            None
        }
    }
}

/// Save a JSON value to `path`, creating parent directories. The file is
/// replaced via a sibling temp file so a crash never leaves it half-written.
///
/// # Errors
///
/// Returns [`PrefsError`] if encoding or any filesystem step fails.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PrefsError> {
    let raw = serde_json::to_string_pretty(value)?;
    let write_err = |source| PrefsError::Write { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, raw).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        write_err(e)
    })
}
