//! Settings lookup
//!
//! Finds the configuration file in the platform config directory and falls
//! back to defaults when none exists.

use crate::config::PrintConfig;
use clay_print_core::Result;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "clay-print";
const CONFIG_FILE: &str = "config.toml";

/// Locates and loads the run configuration
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_path: Option<PathBuf>,
}

impl SettingsManager {
    /// Use the platform config directory (`~/.config/clay-print/config.toml` on Linux)
    pub fn new() -> Self {
        Self {
            config_path: dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)),
        }
    }

    /// Use an explicit config file location
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load the config file if present, defaults otherwise
    pub fn load(&self) -> Result<PrintConfig> {
        match &self.config_path {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from {}", path.display());
                PrintConfig::load_from_file(path)
            }
            Some(path) => {
                tracing::info!("No configuration at {}, using defaults", path.display());
                Ok(PrintConfig::default())
            }
            None => {
                tracing::warn!("No config directory available, using defaults");
                Ok(PrintConfig::default())
            }
        }
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}
