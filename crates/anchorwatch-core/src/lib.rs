//! Anchorwatch Core - shared configuration and error types.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//!
//! # Example
//!
//! ```rust
//! use anchorwatch_core::AppConfig;
//!
//! let config = AppConfig::default();
//! assert!(config.browser.headless);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;

pub use config::{AppConfig, BrowserConfig, LoggingConfig, TimeoutConfig};
pub use error::{AnchorwatchError, ConfigError, ConfigResult, Result};
