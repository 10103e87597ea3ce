//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod jobs;
pub mod logging;
pub mod sharing;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::jobs::{RepairConfig, ScanConfig};
pub use self::logging::LoggingConfig;
pub use self::sharing::SharingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Share dialog / recipient search settings.
    #[serde(default)]
    pub sharing: SharingConfig,
    /// Share integrity repair settings.
    #[serde(default)]
    pub repair: RepairConfig,
    /// Group member scan settings.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for an environment.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `SHAREKIT__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", Some(env))
    }

    /// Load configuration from an explicit base file, optionally overlaid
    /// with a sibling environment file.
    pub fn load_from(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let base = path.trim_end_matches(".toml");
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(base).required(false));

        if let Some(env) = env {
            let dir = std::path::Path::new(base)
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let overlay = if dir.is_empty() {
                env.to_string()
            } else {
                format!("{dir}/{env}")
            };
            builder = builder.add_source(config::File::with_name(&overlay).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("SHAREKIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
