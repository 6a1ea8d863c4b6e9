//! Configuration management for siteboost
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use siteboost::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `SITEBOOST__<section>__<key>`
//!
//! Examples:
//! - `SITEBOOST__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `SITEBOOST__SERVICES__ANALYZER_URL=http://analyzer.internal:8001`
//! - `SITEBOOST__TIMEOUTS__ANALYZE_SECS=180`
//!
//! The shared service credential is a secret and is only ever read from the
//! `SERVICE_AUTH_TOKEN` environment variable, never from the TOML file.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/siteboost.toml`.
//! This can be overridden using the `SITEBOOST_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use models::{AuthConfig, Config, ServerConfig, ServicesConfig, TimeoutConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`SITEBOOST__*`, plus `SERVICE_AUTH_TOKEN`)
    /// 2. TOML file (default: `config/siteboost.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (bad service URL, zero timeout)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
