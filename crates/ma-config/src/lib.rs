//! Meetapp Configuration System
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub queue: QueueConfig,
    pub auth: AuthConfig,
    pub files: FilesConfig,

    /// Enable development mode
    pub dev_mode: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3333,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Primary database (meetups, users, subscriptions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/meetapp.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Outbound notification queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Database backing the embedded queue
    pub url: String,
    pub queue_name: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/queue.db?mode=rwc".to_string(),
            queue_name: "notifications".to_string(),
        }
    }
}

/// Bearer token verification. Tokens are issued by the session service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "meetapp".to_string(),
            audience: "meetapp".to_string(),
        }
    }
}

/// Uploaded file serving
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Public prefix for banner URLs
    pub base_url: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333/files".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Check settings that have no safe default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() && !self.dev_mode {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret must be set outside dev mode".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Meetapp Configuration
# Environment variables (MEETAPP_*) override these settings

dev_mode = false

[http]
port = 3333
host = "0.0.0.0"
cors_origins = ["http://localhost:3000"]

[database]
url = "sqlite://data/meetapp.db?mode=rwc"
max_connections = 5

[queue]
url = "sqlite://data/queue.db?mode=rwc"
queue_name = "notifications"

[auth]
jwt_secret = "change-me"
issuer = "meetapp"
audience = "meetapp"

[files]
base_url = "http://localhost:3333/files"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 3333);
        assert_eq!(config.queue.queue_name, "notifications");
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_example_toml_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.auth.jwt_secret, "change-me");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("[http]\nport = 9000\n").unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.files.base_url, "http://localhost:3333/files");
    }

    #[test]
    fn test_validate_requires_secret_outside_dev_mode() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.dev_mode = true;
        assert!(config.validate().is_ok());

        config.dev_mode = false;
        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meetapp.toml");
        std::fs::write(&path, "[queue]\nqueue_name = \"mail\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.queue.queue_name, "mail");
    }
}
