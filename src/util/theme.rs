//! Light/dark theme preference.
//!
//! The preference is read once at startup and written back on every
//! toggle. It is an explicit value owned by the front end, never ambient
//! process state.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prefs::{self, PrefsError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display preferences persisted between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// Durable storage for [`Preferences`].
#[derive(Clone, Debug)]
pub struct PreferencesFile {
    path: PathBuf,
}

impl PreferencesFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read stored preferences, falling back to defaults.
    #[must_use]
    pub fn load(&self) -> Preferences {
        let prefs = prefs::load_json(&self.path).unwrap_or_default();
        debug!(path = %self.path.display(), ?prefs, "preferences loaded");
        prefs
    }

    /// # Errors
    ///
    /// Returns [`PrefsError`] if the file cannot be written.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        prefs::save_json(&self.path, prefs)
    }
}

/// Flip the theme and persist it. The in-memory flip stands even when the
/// write fails.
///
/// # Errors
///
/// Returns [`PrefsError`] if the new preference could not be saved.
pub fn toggle_theme(prefs: &mut Preferences, file: &PreferencesFile) -> Result<Theme, PrefsError> {
    prefs.theme = prefs.theme.toggled();
    info!(theme = %prefs.theme, "theme toggled");
    file.save(prefs)?;
    Ok(prefs.theme)
}
