//! Service configuration for the online questionnaire backend.
//!
//! Only the pieces consumed by the logging subsystem live here:
//! - [`Config`] — Root configuration document
//! - [`LoggingConfig`] — The `[logging]` section (file, rotation, level)
//!
//! Configuration is written in TOML:
//!
//! ```toml
//! [logging]
//! filename = "logs/app.log"
//! max_size = 104857600
//! max_backups = 3
//! max_age = 28
//! compress = true
//! level = "info"
//! ```

#![forbid(unsafe_code)]

pub mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, Result};

/// Default location of the active log file.
pub const DEFAULT_LOG_FILE: &str = "logs/app.log";

/// Logging section of the service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Path of the active log file.
    pub filename: PathBuf,
    /// Maximum size of the active file in bytes before it is rotated.
    /// Zero disables rotation.
    pub max_size: u64,
    /// Maximum number of rotated files to retain. Zero keeps all of them.
    pub max_backups: usize,
    /// Maximum age of rotated files in days. Zero disables age-based removal.
    pub max_age: u64,
    /// Whether rotated files are gzip-compressed.
    pub compress: bool,
    /// Minimum severity name; empty means the most verbose level.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from(DEFAULT_LOG_FILE),
            max_size: 0,
            max_backups: 0,
            max_age: 0,
            compress: false,
            level: String::new(),
        }
    }
}

impl LoggingConfig {
    /// Creates a logging section writing to the given file with defaults elsewhere.
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Sets the rotation size in bytes.
    #[must_use]
    pub const fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    /// Sets the number of retained backups.
    #[must_use]
    pub const fn with_max_backups(mut self, backups: usize) -> Self {
        self.max_backups = backups;
        self
    }

    /// Sets the retention age in days.
    #[must_use]
    pub const fn with_max_age(mut self, days: u64) -> Self {
        self.max_age = days;
        self
    }

    /// Enables or disables compression of rotated files.
    #[must_use]
    pub const fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Sets the minimum severity name.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Validate the section.
    ///
    /// The level name is not checked here; the logger owns level parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the filename is empty.
    pub fn validate(&self) -> Result<()> {
        if self.filename.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.filename cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Root service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Creates a configuration with the given logging section.
    #[must_use]
    pub const fn with_logging(logging: LoggingConfig) -> Self {
        Self { logging }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any section is invalid.
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parses_full_logging_section() {
        let toml = r#"
            [logging]
            filename = "/var/log/oq/app.log"
            max_size = 10485760
            max_backups = 3
            max_age = 28
            compress = true
            level = "warning"
        "#;

        let config = Config::from_toml(toml).expect("parse config");
        assert_eq!(config.logging.filename, PathBuf::from("/var/log/oq/app.log"));
        assert_eq!(config.logging.max_size, 10_485_760);
        assert_eq!(config.logging.max_backups, 3);
        assert_eq!(config.logging.max_age, 28);
        assert!(config.logging.compress);
        assert_eq!(config.logging.level, "warning");
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_toml("[logging]\nlevel = \"info\"\n").expect("parse config");
        assert_eq!(config.logging.filename, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.logging.max_size, 0);
        assert_eq!(config.logging.max_backups, 0);
        assert!(!config.logging.compress);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml("").expect("parse config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_empty_filename() {
        let result = Config::from_toml("[logging]\nfilename = \"\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test_case("[logging]\nmax_size = \"big\"" ; "string for integer")]
    #[test_case("[logging]\nmax_backups = -1" ; "negative backups")]
    #[test_case("[logging\n" ; "unterminated table")]
    fn rejects_malformed_toml(input: &str) {
        let result = Config::from_toml(input);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nfilename = \"app.log\"\nmax_size = 1\n")
            .expect("write config");

        let config = Config::from_file(&path).expect("load config");
        assert_eq!(config.logging.filename, PathBuf::from("app.log"));
        assert_eq!(config.logging.max_size, 1);
    }

    #[test]
    fn from_file_missing_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");

        let err = Config::from_file(&path).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn builder_sets_fields() {
        let logging = LoggingConfig::new("app.log")
            .with_max_size(5)
            .with_max_backups(2)
            .with_max_age(7)
            .with_compress(true)
            .with_level("error");

        assert_eq!(logging.filename, PathBuf::from("app.log"));
        assert_eq!(logging.max_size, 5);
        assert_eq!(logging.max_backups, 2);
        assert_eq!(logging.max_age, 7);
        assert!(logging.compress);
        assert_eq!(logging.level, "error");
        assert!(Config::with_logging(logging).validate().is_ok());
    }

    #[test]
    fn toml_roundtrip_preserves_section() {
        let original = Config::with_logging(LoggingConfig::new("a.log").with_level("debug"));
        let text = toml::to_string(&original).expect("serialize");
        let parsed = Config::from_toml(&text).expect("parse");
        assert_eq!(parsed, original);
    }
}
