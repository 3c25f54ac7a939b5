//! Process configuration
//!
//! Configuration is read once at startup from environment variables (after
//! an optional local `.env` file) and stays immutable for the life of the
//! process.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use config::{Config, Environment as EnvSource};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Default listen port
pub const DEFAULT_PORT: u16 = 1996;

/// Default listen address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// YouTube Data API v3 media upload endpoint
pub const DEFAULT_YOUTUBE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// Default maximum size of a JSON request body (50 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Deployment environment the process runs in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Whether internal error details may be exposed to callers
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration
///
/// # Environment Variables
/// - `HOST`: listen address (default: "0.0.0.0")
/// - `PORT`: listen port (default: 1996)
/// - `APP_ENV`: "development" or "production" (default: "development")
/// - `YOUTUBE_UPLOAD_URL`: platform upload endpoint
/// - `BODY_LIMIT_BYTES`: maximum JSON body size (default: 50 MiB)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, rename = "app_env")]
    pub environment: Environment,
    #[serde(default = "default_youtube_upload_url")]
    pub youtube_upload_url: String,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_youtube_upload_url() -> String {
    DEFAULT_YOUTUBE_UPLOAD_URL.to_string()
}

fn default_body_limit_bytes() -> usize {
    DEFAULT_BODY_LIMIT_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            youtube_upload_url: default_youtube_upload_url(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfig from the process environment
    ///
    /// A `.env` file in the working directory is read first when present;
    /// variables already set in the environment take precedence.
    pub fn from_env() -> ConfigResult<Self> {
        let process = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();

        Self::from_dotenv(Path::new(".env"), process)
    }

    /// Create a new AppConfig from a dotenv file overlaid with `process`
    ///
    /// A missing file is not an error. The process environment is not
    /// modified.
    pub fn from_dotenv(path: &Path, process: HashMap<String, String>) -> ConfigResult<Self> {
        let mut vars = read_dotenv(path)?;
        vars.extend(process);
        Self::from_vars(vars)
    }

    /// Create a new AppConfig from an explicit set of variables
    ///
    /// Keys use the same names as the environment variables.
    pub fn from_vars(vars: HashMap<String, String>) -> ConfigResult<Self> {
        Self::load(EnvSource::default().source(Some(vars)))
    }

    fn load(source: EnvSource) -> ConfigResult<Self> {
        let config: AppConfig = Config::builder()
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("HOST must not be empty".to_string()));
        }

        if !(self.youtube_upload_url.starts_with("http://")
            || self.youtube_upload_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "YOUTUBE_UPLOAD_URL must be an http(s) URL, got {}",
                self.youtube_upload_url
            )));
        }

        if self.body_limit_bytes == 0 {
            return Err(ConfigError::Invalid(
                "BODY_LIMIT_BYTES must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_dotenv(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let invalid = |e: dotenvy::Error| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    };

    match dotenvy::from_path_iter(path) {
        Ok(lines) => {
            let vars = lines.collect::<Result<HashMap<_, _>, _>>().map_err(invalid)?;
            info!("Loaded {} variables from {}", vars.len(), path.display());
            Ok(vars)
        }
        Err(e) if e.not_found() => {
            debug!("No {} file found", path.display());
            Ok(HashMap::new())
        }
        Err(e) => Err(invalid(e)),
    }
}
