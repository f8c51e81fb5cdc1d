//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Sun dataset settings
    pub sun: SunSettings,
    /// Scheduler settings
    pub scheduler: SchedulerSettings,
}

/// Sun dataset settings
#[derive(Debug, Clone, Deserialize)]
pub struct SunSettings {
    /// Path to the per-day sun dataset JSON file
    pub data_path: String,
}

/// Scheduler settings
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Seconds between evaluation passes
    pub tick_interval_secs: u64,
}

/// Load configuration from embedded defaults, files, and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        .add_source(
            Environment::with_prefix("CASA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
