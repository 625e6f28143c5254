//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every section carries full defaults so the client runs
//! without any configuration file at all.

pub mod api;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + optional override file).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Session persistence and refresh settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an optional explicit override
    /// file and environment variables prefixed with `STAFFDESK_`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("STAFFDESK")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("defaults");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.auth_path, "/api/auth");
        assert_eq!(config.session.expiry_leeway_seconds, 5);
        assert!(!config.session.auto_login_after_register);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn partial_section_keeps_remaining_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api": {"base_url": "https://hr.example.com"}}"#)
                .expect("partial");
        assert_eq!(config.api.base_url, "https://hr.example.com");
        assert_eq!(config.api.employee_path, "/employee");
        assert_eq!(config.api.timeout_seconds, 30);
    }
}
