//! Driver configuration.
//!
//! Read from `cosmic-clicker.yaml` (or the file named by
//! `COSMIC_CLICKER_CONFIG`). Every field is optional; a missing file means
//! all defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::clicker::accrual::DayBoundary;
use crate::error::ConfigError;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "COSMIC_CLICKER_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cosmic-clicker.yaml";

/// Timer cadences and storage location for a play session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Passive income cadence.
    pub tick_interval_ms: i64,
    /// Periodic save cadence.
    pub autosave_interval_ms: i64,
    /// How long the "achievement unlocked" highlight stays on.
    pub highlight_ms: i64,
    /// Longest gap between two driver updates that still earns passive ticks.
    pub max_catch_up_ms: i64,
    /// Calendar used to decide when the daily reward re-arms.
    pub day_boundary: DayBoundary,
    /// Directory for file-backed saves.
    pub save_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            autosave_interval_ms: 10_000,
            highlight_ms: 2_000,
            max_catch_up_ms: 86_400_000,
            day_boundary: DayBoundary::Local,
            save_dir: PathBuf::from(".cosmic-clicker"),
        }
    }
}

impl SessionConfig {
    /// Parse YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from `$COSMIC_CLICKER_CONFIG` or `./cosmic-clicker.yaml`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }
}
