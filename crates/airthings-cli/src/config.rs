//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use airthings_core::DEFAULT_SCAN_SECS;
use airthings_types::UnitSystem;

use crate::cli::{Cli, OutputFormat};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default device address for targeted reads
    #[serde(default)]
    pub device: Option<String>,

    /// Scan timeout in seconds
    #[serde(default)]
    pub timeout: Option<f64>,

    /// Use imperial units
    #[serde(default)]
    pub imperial: bool,

    /// Default output format
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airthings")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`.
    ///
    /// A missing file yields the defaults. Unreadable or malformed files are
    /// logged and also yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}

/// Effective settings for one run after merging flags, environment and config.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub device: Option<String>,
    pub timeout: f64,
    pub units: UnitSystem,
    pub format: OutputFormat,
}

impl Settings {
    /// Merge CLI arguments (which already carry `AIRTHINGS_DEVICE`) over `config`.
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            device: resolve_device(cli.connect.clone(), config),
            timeout: resolve_timeout(cli.timeout, config),
            units: resolve_units(cli.imperial, config),
            format: resolve_format(cli.format, config),
        }
    }
}

/// Resolve device from arg or env var, then config. Blank values count as unset.
pub fn resolve_device(device: Option<String>, config: &Config) -> Option<String> {
    device
        .or_else(|| config.device.clone())
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Resolve timeout: use provided value, fall back to config, then default
pub fn resolve_timeout(cmd_timeout: Option<f64>, config: &Config) -> f64 {
    cmd_timeout
        .or(config.timeout)
        .unwrap_or(DEFAULT_SCAN_SECS)
}

/// `--imperial` can only turn imperial units on; the config may do the same.
pub fn resolve_units(imperial: bool, config: &Config) -> UnitSystem {
    UnitSystem::from_imperial(imperial || config.imperial)
}

pub fn resolve_format(format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    format.or(config.format).unwrap_or_default()
}
