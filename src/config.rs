//! Runtime configuration shared by the demo binaries.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! same behaviour as the hard-coded values used throughout the course.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "COURSE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "course.toml";

// =============================================================================
// Milestone 1: Error types with context
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Missing required field: '{field}' in section [{section}]")]
    MissingField { section: String, field: String },

    #[error("Value {value} for field '{field}' is out of range (min: {min}, max: {max})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn missing_field(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            section: section.into(),
            field: field.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse {
            message: err.message().to_string(),
        }
    }
}

// =============================================================================
// Milestone 2: Typed sections with defaults
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port`, ready for `SocketAddr` parsing.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    pub api_key: String,
    pub rate_limit_per_minute: u32,
    pub allowed_origin: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            api_key: "secret123".to_string(),
            rate_limit_per_minute: 10,
            allowed_origin: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestApiConfig {
    pub version: String,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_age_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            upload_dir: PathBuf::from("uploads"),
            max_age_secs: 3600,
            max_upload_bytes: 10 << 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
    pub conn_max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_open_conns: 25,
            max_idle_conns: 5,
            conn_max_lifetime_secs: 5 * 60,
        }
    }
}

impl DatabaseConfig {
    pub fn conn_max_lifetime(&self) -> Duration {
        Duration::from_secs(self.conn_max_lifetime_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvStoreConfig {
    pub default_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    pub server: ServerConfig,
    pub middleware: MiddlewareConfig,
    pub rest_api: RestApiConfig,
    pub static_files: StaticFilesConfig,
    pub database: DatabaseConfig,
    pub kv_store: KvStoreConfig,
}

// =============================================================================
// Milestone 3: Loading
// =============================================================================

impl CourseConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// `$COURSE_CONFIG`, then `./course.toml`, then built-in defaults.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            tracing::debug!(%path, "loading config from environment");
            return Self::load(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            tracing::debug!(path = DEFAULT_CONFIG_FILE, "loading local config");
            return Self::load(local);
        }

        Ok(Self::default())
    }

    // =========================================================================
    // Milestone 4: Validation with error accumulation
    // =========================================================================

    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        self.validate_server(&mut errors);
        self.validate_middleware(&mut errors);
        self.validate_database(&mut errors);

        if self.rest_api.version.trim().is_empty() {
            errors.push(ConfigError::missing_field("rest_api", "version"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Loads like [`load_or_default`](Self::load_or_default) and rejects
    /// the result unless every section validates.
    pub fn load_validated() -> crate::Result<Self> {
        let config = Self::load_or_default()?;
        config.validate().map_err(crate::CourseError::Validation)?;
        Ok(config)
    }

    fn validate_server(&self, errors: &mut Vec<ConfigError>) {
        let port = i64::from(self.server.port);
        if !(1..=65535).contains(&port) {
            errors.push(ConfigError::out_of_range("server.port", port, 1, 65535));
        }
        if self.server.host.trim().is_empty() {
            errors.push(ConfigError::missing_field("server", "host"));
        }
    }

    fn validate_middleware(&self, errors: &mut Vec<ConfigError>) {
        if self.middleware.api_key.is_empty() {
            errors.push(ConfigError::missing_field("middleware", "api_key"));
        }
        if self.middleware.rate_limit_per_minute == 0 {
            errors.push(ConfigError::invalid_value(
                "middleware.rate_limit_per_minute",
                "0",
                "must allow at least one request",
            ));
        }
    }

    fn validate_database(&self, errors: &mut Vec<ConfigError>) {
        let db = &self.database;
        let max_open = i64::from(db.max_open_conns);
        if !(1..=500).contains(&max_open) {
            errors.push(ConfigError::out_of_range(
                "database.max_open_conns",
                max_open,
                1,
                500,
            ));
        }
        if db.max_idle_conns > db.max_open_conns {
            errors.push(ConfigError::invalid_value(
                "database.max_idle_conns",
                db.max_idle_conns.to_string(),
                "cannot exceed max_open_conns",
            ));
        }
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_course_values() {
        let config = CourseConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.middleware.api_key, "secret123");
        assert_eq!(config.middleware.rate_limit_per_minute, 10);
        assert_eq!(config.rest_api.version, "v1");
        assert_eq!(config.static_files.max_age_secs, 3600);
        assert_eq!(config.database.max_open_conns, 25);
        assert_eq!(config.database.max_idle_conns, 5);
        assert_eq!(config.database.conn_max_lifetime(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CourseConfig::from_toml_str(
            r#"
            [server]
            port = 9090

            [middleware]
            api_key = "letmein"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.middleware.api_key, "letmein");
        assert_eq!(config.middleware.rate_limit_per_minute, 10);
        assert_eq!(config.server.address(), "127.0.0.1:9090");
    }

    #[test]
    fn test_parse_error() {
        let err = CourseConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[database]\npath = \"demo.db\"\nmax_open_conns = 10").unwrap();

        let config = CourseConfig::load(file.path()).unwrap();
        assert_eq!(config.database.path, "demo.db");
        assert_eq!(config.database.max_open_conns, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CourseConfig::load(Path::new("/no/such/course.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validation_accumulates_errors() {
        let mut config = CourseConfig::default();
        config.server.port = 70000;
        config.middleware.api_key.clear();
        config.middleware.rate_limit_per_minute = 0;
        config.database.max_open_conns = 2;
        config.database.max_idle_conns = 5;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigError::out_of_range("server.port", 70000, 1, 65535)));
        assert!(errors.contains(&ConfigError::missing_field("middleware", "api_key")));
    }
}
