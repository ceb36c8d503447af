//! Application configuration
//!
//! Loaded from a TOML file (default: `~/.config/account-service/config.toml`,
//! overridable with the `ACCOUNT_CONFIG` environment variable). Every section
//! has serde defaults so a partial file is enough.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub media: MediaSettings,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

/// Default config file location (`~/.config/account-service/config.toml`)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("account-service")
        .join("config.toml")
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL (e.g., "sqlite://./accounts.db?mode=rwc")
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./accounts.db?mode=rwc".to_string(),
        }
    }
}

/// Token-signing settings.
///
/// An empty `jwt_secret` falls back to the `JWT_SECRET` environment variable;
/// if that is absent too, `main` generates an ephemeral per-process secret.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: 1,
        }
    }
}

/// Object-storage settings for uploaded profile images
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Storage backend: "local" or "s3"
    pub backend: String,
    /// Directory for the local backend
    pub local_dir: String,
    /// Base URL under which stored objects are publicly reachable
    pub public_base_url: String,
    /// Upload size cap in bytes
    pub max_upload_bytes: usize,
    pub s3: S3Settings,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            local_dir: "./media".to_string(),
            public_base_url: "http://localhost:8080/media".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            s3: S3Settings::default(),
        }
    }
}

/// S3 (or S3-compatible) storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct S3Settings {
    pub bucket: String,
    /// AWS region (e.g., "us-east-1")
    pub region: Option<String>,
    /// Optional custom endpoint for S3-compatible providers (e.g. MinIO)
    pub endpoint: Option<String>,
    /// If true, allow plain HTTP for custom endpoints
    pub allow_http: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter (overridden by RUST_LOG)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Bootstrap admin account, created when the users table is empty
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            name: "Administrator".to_string(),
            password: "admin12345".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.security.jwt_expiration_hours, 1);
        assert_eq!(config.media.backend, "local");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let raw = r#"
            [server]
            port = 9090

            [security]
            jwt_secret = "s3cret"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.database.url, "sqlite://./accounts.db?mode=rwc");
    }
}
