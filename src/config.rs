use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";
/// Names an explicit config file; it must then exist.
pub const CONFIG_ENV: &str = "DELIVERY_DASHBOARD_CONFIG";
/// Overrides the dataset path from the config file.
pub const DATA_ENV: &str = "DELIVERY_DATA";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the JSON file.
///
/// ```json
/// { "data_path": "data/delivery_data.csv", "map_center": [12.97, 77.59] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// CSV dataset to load at startup.
    pub data_path: PathBuf,
    /// Initial map centre as `[latitude, longitude]`.
    pub map_center: [f64; 2],
    /// Initial half-width of the map view in degrees.
    pub map_span_deg: f64,
    /// Initial window size in logical pixels.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("delivery_data.csv"),
            // Bangalore
            map_center: [12.9716, 77.5946],
            map_span_deg: 0.15,
            window_size: [1280.0, 860.0],
        }
    }
}

/// Where configuration values can come from, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// File that must exist (from [`CONFIG_ENV`]).
    pub explicit_file: Option<PathBuf>,
    /// File used only if it exists.
    pub default_file: Option<PathBuf>,
    /// Dataset path from [`DATA_ENV`].
    pub data_env: Option<String>,
    /// Dataset path given as the first command-line argument.
    pub cli_data: Option<String>,
}

impl ConfigSources {
    /// Collect sources from the process environment and arguments.
    pub fn from_env() -> Self {
        Self {
            explicit_file: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            default_file: Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
            data_env: std::env::var(DATA_ENV).ok().filter(|v| !v.trim().is_empty()),
            cli_data: std::env::args().nth(1),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config_err = |reason: String| DashboardError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))
    }

    /// Layer defaults, config file, environment and CLI.
    pub fn resolve(sources: &ConfigSources) -> Result<Self> {
        let mut config = match (&sources.explicit_file, &sources.default_file) {
            (Some(path), _) => {
                log::info!("Reading config from {}", path.display());
                Self::from_json_file(path)?
            }
            (None, Some(path)) if path.is_file() => {
                log::info!("Reading config from {}", path.display());
                Self::from_json_file(path)?
            }
            _ => {
                log::debug!("No config file, using defaults");
                Self::default()
            }
        };

        if let Some(path) = &sources.data_env {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = &sources.cli_data {
            config.data_path = PathBuf::from(path);
        }

        Ok(config)
    }
}
