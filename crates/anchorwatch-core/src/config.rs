//! Configuration management for Anchorwatch.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/anchorwatch/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Wait and polling timeouts
    pub timeouts: TimeoutConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if not found.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        let config: Self = if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `ANCHORWATCH_HEADLESS`: Override browser headless mode (true/false)
    /// - `ANCHORWATCH_LOG`: Override the log filter
    pub fn load_with_env(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ANCHORWATCH_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("ANCHORWATCH_LOG") {
            if !val.trim().is_empty() {
                tracing::debug!("Override logging.level from env: {}", val);
                self.logging.level = val;
            }
        }
    }

    /// Save configuration to the default location.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to an explicit path, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        self.validate()?;
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Reject values the browser or the watch loop cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let timeouts = [
            ("timeouts.page_load_secs", self.timeouts.page_load_secs),
            ("timeouts.iframe_secs", self.timeouts.iframe_secs),
            ("timeouts.animation_secs", self.timeouts.animation_secs),
            ("timeouts.poll_interval_ms", self.timeouts.poll_interval_ms),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.window_width/window_height".to_string(),
                reason: "window dimensions must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/anchorwatch/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "anchorwatch", "anchorwatch")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub executable: Option<PathBuf>,
    /// Extra command-line switches passed to the browser
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            executable: None,
            extra_args: Vec::new(),
        }
    }
}

/// Wait and polling timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Page navigation timeout in seconds
    pub page_load_secs: u64,
    /// How long to wait for the widget frames to appear
    pub iframe_secs: u64,
    /// How long a detection watch runs before reporting safe passage
    pub animation_secs: u64,
    /// Delay between probe invocations
    pub poll_interval_ms: u64,
}

impl TimeoutConfig {
    /// Page navigation timeout.
    #[must_use]
    pub fn page_load(&self) -> Duration {
        Duration::from_secs(self.page_load_secs)
    }

    /// Frame readiness timeout.
    #[must_use]
    pub fn iframe(&self) -> Duration {
        Duration::from_secs(self.iframe_secs)
    }

    /// Detection watch timeout.
    #[must_use]
    pub fn animation(&self) -> Duration {
        Duration::from_secs(self.animation_secs)
    }

    /// Probe polling interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            page_load_secs: 30,
            iframe_secs: 30,
            animation_secs: 5,
            poll_interval_ms: 100,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
