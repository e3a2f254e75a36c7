//! Configuration module for fileshelf.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShelfError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Basic authentication credential.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Username expected in the Basic credential.
    #[serde(default)]
    pub username: String,
    /// Password expected in the Basic credential.
    #[serde(default)]
    pub password: String,
    /// Realm announced in the `WWW-Authenticate` challenge.
    #[serde(default = "default_realm")]
    pub realm: String,
}

fn default_realm() -> String {
    "restricted".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            realm: default_realm(),
        }
    }
}

/// Storage directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the storage directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "data".to_string()
}

fn default_max_upload_size() -> u64 {
    50
}

impl StorageConfig {
    /// Upload limit in bytes.
    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Web UI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Directory holding the upload, listing and preview pages.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Redirect to `/` after upload instead of answering with a text message.
    #[serde(default = "default_upload_redirect")]
    pub upload_redirect: bool,
}

fn default_static_path() -> String {
    "static".to_string()
}

fn default_upload_redirect() -> bool {
    true
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_path: default_static_path(),
            upload_redirect: default_upload_redirect(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Web UI configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShelfError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShelfError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables (empty values are ignored):
    /// - `FILESHELF_AUTH_USERNAME`
    /// - `FILESHELF_AUTH_PASSWORD`
    /// - `FILESHELF_STORAGE_PATH`
    pub fn apply_env_overrides(&mut self) {
        if let Some(username) = non_empty_env("FILESHELF_AUTH_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = non_empty_env("FILESHELF_AUTH_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(path) = non_empty_env("FILESHELF_STORAGE_PATH") {
            self.storage.path = path;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the username or password is empty
    /// - the upload limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err(ShelfError::Config(
                "auth.username and auth.password must be set. \
                 Set them in config.toml or via FILESHELF_AUTH_USERNAME / FILESHELF_AUTH_PASSWORD."
                    .to_string(),
            ));
        }
        if self.storage.max_upload_size_mb == 0 {
            return Err(ShelfError::Config(
                "storage.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        assert!(config.auth.username.is_empty());
        assert!(config.auth.password.is_empty());
        assert_eq!(config.auth.realm, "restricted");

        assert_eq!(config.storage.path, "data");
        assert_eq!(config.storage.max_upload_size_mb, 50);
        assert_eq!(config.storage.max_upload_size_bytes(), 50 << 20);

        assert_eq!(config.web.static_path, "static");
        assert!(config.web.upload_redirect);

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[auth]
username = "admin"
password = "hunter2"
realm = "files"

[storage]
path = "/srv/files"
max_upload_size_mb = 10

[web]
static_path = "public"
upload_redirect = false

[logging]
level = "debug"
file = "logs/fileshelf.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.auth.password, "hunter2");
        assert_eq!(config.auth.realm, "files");
        assert_eq!(config.storage.path, "/srv/files");
        assert_eq!(config.storage.max_upload_size_mb, 10);
        assert_eq!(config.web.static_path, "public");
        assert!(!config.web.upload_redirect);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("logs/fileshelf.log"));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[auth]
username = "u"
password = "p"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.realm, "restricted");
        assert_eq!(config.storage.path, "data");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(ShelfError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(ShelfError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides() {
        let original = std::env::var("FILESHELF_AUTH_PASSWORD").ok();

        std::env::set_var("FILESHELF_AUTH_PASSWORD", "from-env");
        let mut config = Config::default();
        config.auth.password = "from-file".to_string();
        config.apply_env_overrides();
        assert_eq!(config.auth.password, "from-env");

        // Empty values do not override
        std::env::set_var("FILESHELF_AUTH_PASSWORD", "");
        let mut config = Config::default();
        config.auth.password = "from-file".to_string();
        config.apply_env_overrides();
        assert_eq!(config.auth.password, "from-file");

        if let Some(val) = original {
            std::env::set_var("FILESHELF_AUTH_PASSWORD", val);
        } else {
            std::env::remove_var("FILESHELF_AUTH_PASSWORD");
        }
    }

    #[test]
    fn test_validate_missing_credentials() {
        let config = Config::default();
        let result = config.validate();
        if let Err(ShelfError::Config(msg)) = result {
            assert!(msg.contains("auth.password"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_zero_upload_limit() {
        let mut config = Config::default();
        config.auth.username = "u".to_string();
        config.auth.password = "p".to_string();
        config.storage.max_upload_size_mb = 0;

        assert!(matches!(config.validate(), Err(ShelfError::Config(_))));
    }
}
