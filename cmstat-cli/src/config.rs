use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::discovery::DEFAULT_HOST;
use crate::error::{AppError, Result};

/// Persisted CLI settings. Only the modem address and presentation
/// preferences are stored; snapshots never touch disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
    pub output: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            poll_interval_secs: cablemodem_parser::DEFAULT_POLL_INTERVAL.as_secs(),
            timeout_secs: cablemodem_parser::DEFAULT_TIMEOUT.as_secs(),
            output: OutputFormat::default(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/cmstat/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cmstat").join("config.toml"))
    }

    fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        path.map(Path::to_path_buf)
            .or_else(Self::default_path)
            .ok_or_else(|| AppError::config("could not determine the configuration directory"))
    }

    /// Loads the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.validate()?;
        let path = Self::resolve_path(path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "Saved configuration");
        Ok(path)
    }

    pub fn reset(path: Option<&Path>) -> Result<PathBuf> {
        Self::default().save(path)
    }

    pub fn show(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::config("host must not be empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(AppError::config("poll_interval_secs must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
