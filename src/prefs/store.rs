//! Preference store backed by a JSON file
//!
//! Provides a `PreferenceStore` that loads and saves user preferences. Reads
//! never fail: a missing or corrupt file is treated as the defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::data::Location;

/// File name of the preferences document
const PREFERENCES_FILE: &str = "preferences.json";

/// Color theme of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Everything remembered between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    /// Last location the dashboard showed
    #[serde(default)]
    pub location: Option<Location>,
}

/// Reads and writes preferences to disk
///
/// Without a resolvable config directory the store keeps working in memory
/// only: loads return defaults and saves are skipped.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    /// Directory holding the preferences file
    config_dir: Option<PathBuf>,
}

impl PreferenceStore {
    /// Creates a store in the XDG-compliant config directory
    pub fn new() -> Self {
        let config_dir = ProjectDirs::from("", "", "skydash").map(|dirs| dirs.config_dir().to_path_buf());
        Self { config_dir }
    }

    /// Creates a store in a custom directory
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir: Some(config_dir),
        }
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self { config_dir: None }
    }

    /// Path of the preferences file, if the store is backed by disk
    pub fn path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Loads preferences, falling back to defaults
    pub fn load(&self) -> Preferences {
        let Some(path) = self.path() else {
            return Preferences::default();
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                debug!(path = %path.display(), "No saved preferences");
                return Preferences::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable preferences");
            Preferences::default()
        })
    }

    /// Writes preferences to disk, creating the directory if needed
    ///
    /// # Returns
    /// * `Ok(())` on success, or when the store is in-memory
    /// * `Err` if directory creation or file writing fails
    pub fn save(&self, preferences: &Preferences) -> std::io::Result<()> {
        let (Some(dir), Some(path)) = (self.config_dir.as_ref(), self.path()) else {
            return Ok(());
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(path, json)
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (PreferenceStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let (store, _temp_dir) = create_test_store();
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let (store, temp_dir) = create_test_store();
        let preferences = Preferences {
            theme: Theme::Light,
            location: Some(Location::new("Lisbon", 38.72, -9.14)),
        };

        store.save(&preferences).expect("Save should succeed");

        assert!(temp_dir.path().join("preferences.json").exists());
        assert_eq!(store.load(), preferences);
    }

    #[test]
    fn test_file_stores_theme_in_lowercase() {
        let (store, temp_dir) = create_test_store();
        store
            .save(&Preferences {
                theme: Theme::Light,
                location: None,
            })
            .unwrap();

        let content = fs::read_to_string(temp_dir.path().join("preferences.json")).unwrap();
        assert!(content.contains("\"light\""));
    }

    #[test]
    fn test_corrupt_file_reads_as_defaults() {
        let (store, temp_dir) = create_test_store();
        fs::write(temp_dir.path().join("preferences.json"), "{ not json").unwrap();

        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let (store, temp_dir) = create_test_store();
        fs::write(temp_dir.path().join("preferences.json"), r#"{"theme": "light"}"#).unwrap();

        let preferences = store.load();
        assert_eq!(preferences.theme, Theme::Light);
        assert_eq!(preferences.location, None);
    }

    #[test]
    fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("config");
        let store = PreferenceStore::with_dir(nested_path.clone());

        store.save(&Preferences::default()).expect("Save should succeed");

        assert!(nested_path.join("preferences.json").exists());
    }

    #[test]
    fn test_in_memory_store() {
        let store = PreferenceStore::in_memory();
        assert!(store.path().is_none());
        store
            .save(&Preferences {
                theme: Theme::Light,
                location: None,
            })
            .expect("In-memory save is a no-op");
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_new_uses_project_name() {
        if let Some(path) = PreferenceStore::new().path() {
            assert!(path.to_string_lossy().contains("skydash"));
        }
        // Passes when no home directory is available (e.g. CI)
    }
}
