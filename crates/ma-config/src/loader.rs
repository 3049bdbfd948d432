//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "meetapp.toml",
    "./config/config.toml",
    "/etc/meetapp/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok());

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("MEETAPP_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `MEETAPP_*` overrides. Unparseable numeric values are ignored.
fn apply_overrides<F>(config: &mut AppConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = var("MEETAPP_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(val) = var("MEETAPP_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = var("MEETAPP_CORS_ORIGINS") {
        config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
    }

    // Database
    if let Some(val) = var("MEETAPP_DATABASE_URL") {
        config.database.url = val;
    }
    if let Some(max) = var("MEETAPP_DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
        config.database.max_connections = max;
    }

    // Queue
    if let Some(val) = var("MEETAPP_QUEUE_URL") {
        config.queue.url = val;
    }
    if let Some(val) = var("MEETAPP_QUEUE_NAME") {
        config.queue.queue_name = val;
    }

    // Auth
    if let Some(val) = var("MEETAPP_JWT_SECRET") {
        config.auth.jwt_secret = val;
    }
    if let Some(val) = var("MEETAPP_JWT_ISSUER") {
        config.auth.issuer = val;
    }
    if let Some(val) = var("MEETAPP_JWT_AUDIENCE") {
        config.auth.audience = val;
    }

    // Files
    if let Some(val) = var("MEETAPP_FILES_BASE_URL") {
        config.files.base_url = val;
    }

    if let Some(val) = var("MEETAPP_DEV_MODE") {
        config.dev_mode = val == "true" || val == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::default();
        apply_overrides(&mut config, |key| vars.get(key).cloned());
        config
    }

    #[test]
    fn test_env_overrides() {
        let config = overrides(&[
            ("MEETAPP_HTTP_PORT", "8081"),
            ("MEETAPP_CORS_ORIGINS", "http://a.test, http://b.test"),
            ("MEETAPP_JWT_SECRET", "s3cret"),
            ("MEETAPP_QUEUE_NAME", "mail"),
            ("MEETAPP_DEV_MODE", "1"),
        ]);

        assert_eq!(config.http.port, 8081);
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.queue.queue_name, "mail");
        assert!(config.dev_mode);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let config = overrides(&[("MEETAPP_HTTP_PORT", "not-a-port")]);
        assert_eq!(config.http.port, 3333);
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[database]\nmax_connections = 2\n").unwrap();

        let config = ConfigLoader::with_path(&path).load().unwrap();
        assert_eq!(config.database.max_connections, 2);
    }
}
