//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Endpoint
    pub api_base: Option<String>,

    // View
    pub wrap_output: bool,
    pub show_request_log: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            api_base: None,
            wrap_output: true,
            show_request_log: true,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn api_base_or_default(&self) -> String {
        self.api_base
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            api_base: Some("http://127.0.0.1:9000".into()),
            wrap_output: false,
            ..Default::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.api_base.as_deref(), Some("http://127.0.0.1:9000"));
        assert!(!loaded.wrap_output);
        assert!(loaded.show_request_log);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();

        let loaded = Settings::load(dir.path());
        assert!(loaded.api_base.is_none());
        assert!(loaded.wrap_output);
    }

    #[test]
    fn empty_api_base_falls_back_to_default() {
        let settings = Settings {
            api_base: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(settings.api_base_or_default(), DEFAULT_API_BASE);
    }
}
