//! Core error types for Anchorwatch.
//!
//! The detection probe itself never fails; these errors cover the layers
//! around it (configuration, the browser, the command-line driver).

use thiserror::Error;

/// Central error type for Anchorwatch operations.
#[derive(Error, Debug)]
pub enum AnchorwatchError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Browser automation errors (launch, navigation, frame lookup)
    #[error("browser error: {0}")]
    Browser(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Refused to overwrite an existing config file
    #[error("config file already exists at {path}")]
    AlreadyExists {
        /// Path of the existing file
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `AnchorwatchError`.
pub type Result<T> = std::result::Result<T, AnchorwatchError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
