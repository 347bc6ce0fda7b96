//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Record store backend and Redis connection settings
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//! - `verification` - Code length, expiry and retention policy
//!
//! Sources are layered, later ones winning:
//! 1. struct defaults
//! 2. a config file (`PV_CONFIG_FILE`, or `config.{toml,json,yaml}` in the
//!    working directory if present)
//! 3. environment variables such as `PV__VERIFICATION__CODE_LENGTH=6`
//! 4. a legacy JSON file named by `PV_LEGACY_CONFIG`, which only carries
//!    the verification settings

pub mod cache;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Re-export commonly used types
pub use cache::{CacheConfig, StoreBackend, StoreConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_FILE_ENV: &str = "PV_CONFIG_FILE";

/// Environment variable naming a legacy verification config file
pub const LEGACY_CONFIG_ENV: &str = "PV_LEGACY_CONFIG";

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "PV";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Legacy configuration error: {0}")]
    Legacy(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default = "Environment::from_env")]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Verification policy
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        let legacy = std::env::var_os(LEGACY_CONFIG_ENV).map(PathBuf::from);
        Self::load_from(file.as_deref(), legacy.as_deref())
    }

    /// Load configuration from explicit file locations.
    ///
    /// An explicit `file` must exist; without one, `config.*` in the
    /// working directory is used when present.
    pub fn load_from(file: Option<&Path>, legacy: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;

        if let Some(path) = legacy {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            app_config.verification.apply_legacy_json(&contents)?;
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        self.verification.validate()
    }
}
