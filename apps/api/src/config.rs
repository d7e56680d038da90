//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file in the working directory is read first when present.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Development signing secret. Used only when `JWT_SECRET` is unset.
pub const DEV_JWT_SECRET: &str = "sweetshop-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Max pooled SQLite connections
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_expiry_secs: i64,

    /// First registered account becomes admin
    pub bootstrap_first_admin: bool,

    /// Max request body size in bytes (default: 50MB, room for data-URI images)
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 3001,
            database_path: PathBuf::from("./sweetshop.db"),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiry_secs: 3600,
            bootstrap_first_admin: true,
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is normal outside local development.
        let _ = dotenvy::dotenv();

        let defaults = ApiConfig::default();

        let config = ApiConfig {
            port: parse_var("SWEETSHOP_PORT", defaults.port)?,

            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,

            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),

            jwt_expiry_secs: parse_var("JWT_EXPIRY_SECS", defaults.jwt_expiry_secs)?,

            bootstrap_first_admin: parse_var(
                "SWEETSHOP_BOOTSTRAP_FIRST_ADMIN",
                defaults.bootstrap_first_admin,
            )?,

            max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.max_body_bytes)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }
        if self.jwt_expiry_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXPIRY_SECS".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        Ok(())
    }

    /// True while the signing secret is the built-in development value.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.jwt_expiry_secs, 3600);
        assert_eq!(config.max_body_bytes, 52_428_800);
        assert!(config.bootstrap_first_admin);
        assert!(config.uses_dev_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        // Unique name; no other test touches it.
        env::set_var("SWEETSHOP_TEST_PARSE_PORT", "not-a-port");
        let result: Result<u16, _> = parse_var("SWEETSHOP_TEST_PARSE_PORT", 1);
        assert!(matches!(result, Err(ConfigError::InvalidValue(ref name)) if name == "SWEETSHOP_TEST_PARSE_PORT"));
        env::remove_var("SWEETSHOP_TEST_PARSE_PORT");

        let fallback: u16 = parse_var("SWEETSHOP_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(fallback, 7);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ApiConfig {
            jwt_expiry_secs: 0,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            jwt_secret: "  ".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRequired(_))));
    }
}
