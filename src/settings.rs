//! Persistent settings for the focus tool.
//! Stored in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::error::FocusError;
use crate::overlay::{FontError, LabelFont, Overlay, OverlayStyle};
use crate::pipeline::FramePipeline;
use crate::source::{HttpSnapshotSource, DEFAULT_CAMERA_URL, DEFAULT_FETCH_TIMEOUT};

/// Environment variable overriding [`Settings::camera_url`].
pub const ENV_CAMERA_URL: &str = "TOOLFOCUS_CAMERA_URL";
/// Environment variable overriding [`Settings::fetch_timeout_ms`].
pub const ENV_FETCH_TIMEOUT_MS: &str = "TOOLFOCUS_FETCH_TIMEOUT_MS";
/// Environment variable overriding [`Settings::font_path`].
pub const ENV_FONT: &str = "TOOLFOCUS_FONT";

/// Settings errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot determine config directory")]
    NoConfigDir,
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to load label font: {0}")]
    Font(#[from] FontError),
    #[error(transparent)]
    Source(#[from] FocusError),
}

/// Settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera snapshot URL
    pub camera_url: String,
    /// Snapshot request timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Optional TrueType font for the score label
    pub font_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_url: DEFAULT_CAMERA_URL.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT.as_millis() as u64,
            font_path: None,
        }
    }
}

impl Settings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "toolfocus", "toolfocus")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file, falling back to defaults.
    pub fn load() -> Self {
        Self::settings_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|content| Self::from_json(&content))
            .unwrap_or_default()
    }

    /// Parse settings JSON; unreadable content yields the defaults.
    pub fn from_json(content: &str) -> Self {
        let mut loaded: Self = serde_json::from_str(content).unwrap_or_default();

        // Backfill fields that older files left empty
        if loaded.camera_url.trim().is_empty() {
            loaded.camera_url = DEFAULT_CAMERA_URL.to_string();
        }
        if loaded.fetch_timeout_ms == 0 {
            loaded.fetch_timeout_ms = DEFAULT_FETCH_TIMEOUT.as_millis() as u64;
        }
        loaded
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let dir = Self::config_dir().ok_or(SettingsError::NoConfigDir)?;
        fs::create_dir_all(&dir)?;

        let path = dir.join("settings.json");
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Apply `TOOLFOCUS_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_CAMERA_URL).filter(|v| !v.trim().is_empty()) {
            self.camera_url = url;
        }
        if let Some(ms) = lookup(ENV_FETCH_TIMEOUT_MS).and_then(|v| v.parse().ok()) {
            if ms > 0 {
                self.fetch_timeout_ms = ms;
            }
        }
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.font_path = Some(font);
        }
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Build the overlay, loading the configured font if there is one.
    pub fn overlay(&self) -> Result<Overlay, SettingsError> {
        let font = match &self.font_path {
            Some(path) => LabelFont::from_file(path)?,
            None => LabelFont::Stroke,
        };
        Ok(Overlay::new(OverlayStyle::default(), font))
    }

    /// Build a pipeline that reads from the configured camera.
    pub fn pipeline(&self) -> Result<FramePipeline<HttpSnapshotSource>, SettingsError> {
        let source = HttpSnapshotSource::new(&self.camera_url, self.fetch_timeout())?;
        Ok(FramePipeline::new(source, self.overlay()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.camera_url, "http://localhost:8080/?action=snapshot");
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(5));
        assert!(settings.font_path.is_none());
    }

    #[test]
    fn test_from_json_backfills() {
        let settings = Settings::from_json(r#"{"camera_url": "", "fetch_timeout_ms": 0}"#);
        assert_eq!(settings, Settings::default());

        let settings = Settings::from_json(r#"{"camera_url": "http://octopi.local/webcam/?action=snapshot"}"#);
        assert_eq!(settings.camera_url, "http://octopi.local/webcam/?action=snapshot");
        assert_eq!(settings.fetch_timeout_ms, 5000);

        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_CAMERA_URL, "http://camera.local/snap.jpg"),
            (ENV_FETCH_TIMEOUT_MS, "1500"),
            (ENV_FONT, "/usr/share/fonts/DejaVuSans.ttf"),
        ]
        .into_iter()
        .collect();
        let settings =
            Settings::default().with_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.camera_url, "http://camera.local/snap.jpg");
        assert_eq!(settings.fetch_timeout(), Duration::from_millis(1500));
        assert_eq!(
            settings.font_path.as_deref(),
            Some("/usr/share/fonts/DejaVuSans.ttf")
        );
    }

    #[test]
    fn test_overrides_ignore_invalid_values() {
        let settings = Settings::default().with_overrides(|key| match key {
            ENV_FETCH_TIMEOUT_MS => Some("soon".to_string()),
            ENV_CAMERA_URL => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overlay_with_missing_font() {
        let settings = Settings {
            font_path: Some("/nonexistent/toolfocus/font.ttf".to_string()),
            ..Settings::default()
        };
        assert!(matches!(settings.overlay(), Err(SettingsError::Font(_))));
    }

    #[test]
    fn test_pipeline_from_defaults() {
        let pipeline = Settings::default().pipeline().unwrap();
        assert_eq!(pipeline.source().url(), DEFAULT_CAMERA_URL);
    }
}
