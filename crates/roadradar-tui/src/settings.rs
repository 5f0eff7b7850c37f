//! User settings persisted as JSON in the platform config directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use roadradar_core::radar::DEFAULT_SCALE;
use roadradar_core::NavPolicy;
use serde::{Deserialize, Serialize};

/// Everything the user can tune. Unknown fields in the file are ignored
/// and missing ones take defaults, so old files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,
    #[serde(default)]
    pub policy: NavPolicy,
    /// Radar cells per degree of longitude.
    #[serde(default = "default_scale")]
    pub radar_scale: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            osrm_url: default_osrm_url(),
            policy: NavPolicy::default(),
            radar_scale: default_scale(),
        }
    }
}

fn default_theme() -> String {
    "classic".to_string()
}

fn default_osrm_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

/// Platform config directory, e.g. ~/.config/roadradar.
pub fn config_root() -> PathBuf {
    ProjectDirs::from("com", "startuz", "roadradar")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loads and saves one settings file.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            path: config_root().join("settings.json"),
        }
    }

    /// Use an explicit file instead of the platform location.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Missing file means defaults; a malformed file is an error the
    /// caller decides how to handle.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
