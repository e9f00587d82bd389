//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_name: String,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub seed_sample_data: bool,
    /// Upper bound for a single attachment upload, in bytes
    pub max_attachment_bytes: u64,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Environment variables use the `SEMINARHUB` prefix and `__` as the
    /// nesting separator, e.g. `SEMINARHUB__DATABASE__URL`.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections)?
            .set_default("database.min_connections", defaults.database.min_connections)?
            .set_default("database.acquire_timeout_seconds", defaults.database.acquire_timeout_seconds)?
            .set_default("database.run_migrations", defaults.database.run_migrations)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.directory", defaults.logging.directory)?
            .set_default("logging.file_name", defaults.logging.file_name)?
            .set_default("logging.json", defaults.logging.json)?
            .set_default("features.seed_sample_data", defaults.features.seed_sample_data)?
            .set_default("features.max_attachment_bytes", defaults.features.max_attachment_bytes)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SEMINARHUB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SeminarHubError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/seminarhub".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
                run_migrations: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_name: "seminarhub.log".to_string(),
                json: false,
            },
            features: FeaturesConfig {
                seed_sample_data: false,
                max_attachment_bytes: 10 * 1024 * 1024,
            },
        }
    }
}
