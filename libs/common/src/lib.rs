//! Common library for the upload relay
//!
//! This crate provides the ambient pieces shared by the services in this
//! workspace: configuration loading, configuration errors and logging
//! initialisation.

pub mod config;
pub mod error;
pub mod logging;

/// Example usage of the configuration module
///
/// ```rust,no_run
/// use common::config::AppConfig;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     common::logging::init_tracing();
///     let config = AppConfig::from_env()?;
///     println!("Listening on {}", config.bind_address());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
