//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{
    DEFAULT_AUTH_PROCEDURE, DEFAULT_BLOCKED_EMAIL_DOMAINS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_DIAGNOSTICS_CHANNEL_CAPACITY, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Schema-qualified or bare SQL identifier, lowercase only
static PROCEDURE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)?$").expect("procedure name pattern")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub intake: IntakeConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Database-side procedure that verifies credentials and issues a session
    pub auth_procedure: String,
}

/// Login intake configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Lowercased email domains that may not log in
    pub blocked_email_domains: Vec<String>,
}

/// Error diagnostics configuration
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    pub channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            intake: IntakeConfig::from_env()?,
            diagnostics: DiagnosticsConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let auth_procedure =
            env::var("AUTH_PROCEDURE").unwrap_or_else(|_| DEFAULT_AUTH_PROCEDURE.to_string());
        validate_procedure_name(&auth_procedure)?;

        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
            auth_procedure,
        })
    }
}

impl IntakeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let blocked_email_domains = match env::var("BLOCKED_EMAIL_DOMAINS") {
            Ok(raw) => parse_domain_list(&raw),
            Err(_) => DEFAULT_BLOCKED_EMAIL_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        };

        Ok(Self {
            blocked_email_domains,
        })
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            blocked_email_domains: DEFAULT_BLOCKED_EMAIL_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl DiagnosticsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let channel_capacity: usize = env::var("DIAGNOSTICS_CHANNEL_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_DIAGNOSTICS_CHANNEL_CAPACITY.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DIAGNOSTICS_CHANNEL_CAPACITY".to_string()))?;

        // tokio's bounded channel panics on zero capacity
        if channel_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "DIAGNOSTICS_CHANNEL_CAPACITY".to_string(),
            ));
        }

        Ok(Self { channel_capacity })
    }
}

/// Split a comma-separated domain list, trimming and lowercasing each entry
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

/// The procedure name is interpolated into SQL, so only plain identifiers pass
fn validate_procedure_name(name: &str) -> Result<(), ConfigError> {
    if PROCEDURE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue("AUTH_PROCEDURE".to_string()))
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
