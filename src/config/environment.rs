// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing

//! Environment-based configuration management

use crate::constants::auth_limits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric JWT signing secret
    pub jwt_secret: String,
    /// JWT expiry time in hours
    pub jwt_expiry_hours: i64,
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Log level
    pub log_level: LogLevel,
    /// Database URL (`sqlite:path` or `sqlite::memory:`)
    pub database_url: String,
    /// Authentication configuration
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables: `HTTP_PORT`, `HOST`, `RUST_LOG`, `DATABASE_URL`,
    /// `JWT_SECRET` (required), `JWT_EXPIRY_HOURS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or a numeric variable
    /// fails to parse.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = env_var_or("HTTP_PORT", "3000")
            .parse()
            .context("Invalid HTTP_PORT value")?;
        let host = env_var_or("HOST", "127.0.0.1");
        let log_level = LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info"));
        let database_url = env_var_or("DATABASE_URL", "sqlite:data/fitflow.db");

        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (no insecure default is provided)")?;
        let jwt_expiry_hours = env_var_or(
            "JWT_EXPIRY_HOURS",
            &auth_limits::DEFAULT_TOKEN_EXPIRY_HOURS.to_string(),
        )
        .parse()
        .context("Invalid JWT_EXPIRY_HOURS value")?;

        Ok(Self {
            http_port,
            host,
            log_level,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours,
            },
        })
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "FitFlow Server Configuration:\n\
             - HTTP Port: {}\n\
             - Host: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - JWT Expiry: {}h",
            self.http_port, self.host, self.log_level, self.database_url, self.auth.jwt_expiry_hours
        )
    }
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }

    #[test]
    fn test_summary_excludes_secret() {
        let config = ServerConfig {
            http_port: 3000,
            host: "127.0.0.1".into(),
            log_level: LogLevel::Info,
            database_url: "sqlite::memory:".into(),
            auth: AuthConfig {
                jwt_secret: "super-secret".into(),
                jwt_expiry_hours: 720,
            },
        };
        assert!(!config.summary().contains("super-secret"));
    }
}
