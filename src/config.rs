//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the lunar-config.toml file.
//! It provides a centralized way to tune the extrema search, pick the ephemeris model,
//! and adjust how results are displayed.
//!
//! Every section and field is optional; anything missing takes its default value.

use crate::lunar::EphemerisModel;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "lunar-config.toml";

/// Application configuration loaded from lunar-config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Sampling steps of the two-phase search
    pub search: SearchConfig,
    /// Distance model selection
    pub ephemeris: EphemerisConfig,
    /// Table output options
    pub display: DisplayConfig,
}

/// Sampling parameters for the coarse scan and the refinement pass
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Spacing of the coarse scan across the year
    pub coarse_step_hours: i64,
    /// Refinement covers this many hours on each side of a candidate
    pub refine_half_window_hours: i64,
    /// Spacing of samples inside a refinement window
    pub refine_step_minutes: i64,
}

/// Ephemeris model configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Which built-in distance model feeds the search
    pub model: EphemerisModel,
}

/// Display and formatting configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colour the table (applied only when stdout is a terminal)
    pub color: bool,
    /// chrono strftime pattern for event dates
    pub date_format: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            coarse_step_hours: 6,
            refine_half_window_hours: 12,
            refine_step_minutes: 5,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            color: true,
            date_format: "%b %d %H:%M".to_string(), // e.g. "Jan 13 10:35"
        }
    }
}

impl Config {
    /// Load configuration from lunar-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        "Loaded configuration from {} (model: {})",
                        path.display(),
                        config.ephemeris.model
                    );
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format in {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file found at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
