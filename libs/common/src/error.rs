//! Custom error types for the common library
//!
//! This module defines the errors raised while assembling the process
//! configuration at startup.

use thiserror::Error;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
