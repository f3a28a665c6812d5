//! Persisted application settings.
//!
//! Stored as pretty-printed JSON. A missing file is created with defaults on
//! first load; an unreadable one is ignored with a warning so a corrupt
//! settings file never blocks processing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::BindingDefaults;
use crate::pipeline::PipelineError;

/// Conventional settings file name.
pub const SETTINGS_FILE: &str = "einstellungen.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root under which per-invoice output directories are created.
    pub output_directory: PathBuf,
    /// Model file used by the draft extractor.
    pub llm_model_path: PathBuf,
    /// Logo for rendered documents. Not used by the XML renderers.
    pub logo_path: Option<PathBuf>,
    /// Output directory of the most recent run.
    pub last_output_path: Option<PathBuf>,
    /// Defaults applied while binding drafts.
    pub defaults: BindingDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("output"),
            llm_model_path: PathBuf::from("models/model.gguf"),
            logo_path: None,
            last_output_path: None,
            defaults: BindingDefaults::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// Writes the defaults to `path` when it does not exist yet. Only I/O
    /// failures are errors; malformed JSON falls back to the defaults.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            info!(path = %path.display(), "created default settings");
            return Ok(settings);
        }

        let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        match serde_json::from_str(&text) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable settings, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write settings to `path` as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PipelineError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"output_directory": "/tmp/out", "defaults": {"currency_code": "CHF"}}"#,
        )
        .unwrap();
        assert_eq!(settings.output_directory, PathBuf::from("/tmp/out"));
        assert_eq!(settings.defaults.currency_code, "CHF");
        assert_eq!(settings.defaults.country_code, "DE");
        assert_eq!(settings.llm_model_path, PathBuf::from("models/model.gguf"));
    }

    #[test]
    fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join(SETTINGS_FILE);
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn load_falls_back_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let settings = Settings {
            last_output_path: Some(dir.path().join("RE-1")),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
