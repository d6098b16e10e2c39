//! Configuration management for login-gate
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables. The resulting
//! [`Config`] is constructed once at startup and passed explicitly to the
//! components that need it; nothing mutates it afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // Expand ${VAR} references before parsing
        let expanded = expand_env_vars(yaml);
        let config: Config = serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables with prefix LOGIN_GATE_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("LOGIN_GATE_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("LOGIN_GATE_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        if let Ok(path) = std::env::var("LOGIN_GATE_DATABASE_PATH") {
            config.database.path = path;
        }

        if let Ok(secret) = std::env::var("LOGIN_GATE_SECRET_KEY") {
            config.auth.secret_key = secret;
        }
        if let Ok(ttl) = std::env::var("LOGIN_GATE_SESSION_TTL_SECS") {
            config.auth.session_ttl_secs = ttl
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid session TTL".to_string()))?;
        }

        if let Ok(level) = std::env::var("LOGIN_GATE_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The cookie-signing key must provide at least 512 bits of material
        if self.auth.secret_key.len() < 64 {
            return Err(ConfigError::InvalidValue(
                "auth.secret_key must be at least 64 bytes".to_string(),
            ));
        }
        if self.auth.hash_memory_kib < 8 {
            return Err(ConfigError::InvalidValue(
                "auth.hash_memory_kib must be at least 8".to_string(),
            ));
        }
        if self.auth.hash_iterations == 0 || self.auth.hash_parallelism == 0 {
            return Err(ConfigError::InvalidValue(
                "auth hash cost parameters must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Secret key used to sign session cookies
    ///
    /// The shipped default is a development key; deployments must override it.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Session inactivity expiry in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Argon2id memory cost in KiB
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,

    /// Argon2id iteration count
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    /// Argon2id lane count
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            session_ttl_secs: default_session_ttl(),
            hash_memory_kib: default_hash_memory_kib(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

fn default_secret_key() -> String {
    // Development-only signing key, 64 bytes
    "update_me_update_me_update_me_update_me_update_me_update_me_0000".to_string()
}

fn default_session_ttl() -> u64 {
    86400 // 24 hours
}

fn default_hash_memory_kib() -> u32 {
    19456 // 19 MiB, Argon2id first recommended parameter set
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite database path, or `:memory:`
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "users.db".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
