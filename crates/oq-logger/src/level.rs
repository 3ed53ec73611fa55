//! Severity levels and the threshold filter.
//!
//! - [`LogLevel`] — The five severities, ordered from most to least verbose
//! - [`LevelFilter`] — Minimum-severity gate parsed from configuration text

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

/// Log severity levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debugging information
    Debug = 0,
    /// General information
    Info = 1,
    /// Something unexpected that the caller recovered from
    #[serde(rename = "WARN")]
    Warning = 2,
    /// Error conditions; records carry a stacktrace
    Error = 3,
    /// Unrecoverable conditions; the process exits after the record is written
    Fatal = 4,
}

impl LogLevel {
    /// All levels, most verbose first.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Fatal,
    ];

    /// Returns true if this level is at least as severe as the given level.
    #[must_use]
    pub fn is_at_least(&self, level: Self) -> bool {
        *self >= level
    }

    /// Returns the capitalized name written to log files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Whether records at this level carry a stacktrace.
    #[must_use]
    pub fn captures_stacktrace(&self) -> bool {
        self.is_at_least(Self::Error)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

/// Minimum severity a record must have to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    threshold: LogLevel,
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl LevelFilter {
    /// Creates a filter admitting `threshold` and everything more severe.
    #[must_use]
    pub const fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    /// Parses a threshold from configuration text.
    ///
    /// Empty (or whitespace-only) text selects [`LogLevel::Debug`].
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidLevel`] for unrecognized names.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        text.parse().map(Self::new)
    }

    /// Returns the configured threshold.
    #[must_use]
    pub const fn threshold(&self) -> LogLevel {
        self.threshold
    }

    /// Returns true iff `level` is at or above the threshold.
    #[inline]
    #[must_use]
    pub fn admits(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn log_level_as_str() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Warning.as_str(), "WARN");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
        assert_eq!(LogLevel::Fatal.as_str(), "FATAL");
    }

    #[test]
    fn log_level_serialization_matches_display() {
        for level in LogLevel::ALL {
            let json = serde_json::to_string(&level).expect("serialize level");
            assert_eq!(json, format!("\"{level}\""));
            let back: LogLevel = serde_json::from_str(&json).expect("deserialize level");
            assert_eq!(back, level);
        }
    }

    #[test]
    fn stacktrace_only_for_error_and_above() {
        assert!(!LogLevel::Debug.captures_stacktrace());
        assert!(!LogLevel::Info.captures_stacktrace());
        assert!(!LogLevel::Warning.captures_stacktrace());
        assert!(LogLevel::Error.captures_stacktrace());
        assert!(LogLevel::Fatal.captures_stacktrace());
    }

    #[test_case("debug", LogLevel::Debug ; "debug")]
    #[test_case("info", LogLevel::Info ; "info")]
    #[test_case("warn", LogLevel::Warning ; "warn")]
    #[test_case("warning", LogLevel::Warning ; "warning")]
    #[test_case("error", LogLevel::Error ; "error")]
    #[test_case("fatal", LogLevel::Fatal ; "fatal")]
    #[test_case("INFO", LogLevel::Info ; "uppercase")]
    #[test_case(" Warning ", LogLevel::Warning ; "padded mixed case")]
    fn parse_recognized_names(text: &str, expected: LogLevel) {
        let filter = LevelFilter::parse(text).expect("parse level");
        assert_eq!(filter.threshold(), expected);
    }

    #[test_case("verbose" ; "unknown word")]
    #[test_case("trace" ; "unsupported level")]
    #[test_case("inf" ; "prefix")]
    #[test_case("3" ; "numeric")]
    fn parse_rejects_unknown_names(text: &str) {
        let result = LevelFilter::parse(text);
        assert!(matches!(result, Err(LogError::InvalidLevel(ref name)) if name == text));
    }

    #[test]
    fn empty_text_defaults_to_debug() {
        assert_eq!(LevelFilter::parse("").expect("empty").threshold(), LogLevel::Debug);
        assert_eq!(LevelFilter::parse("  ").expect("blank").threshold(), LogLevel::Debug);
    }

    #[test]
    fn warning_threshold_admits_warning_and_above() {
        let filter = LevelFilter::parse("warning").expect("parse");
        assert!(!filter.admits(LogLevel::Debug));
        assert!(!filter.admits(LogLevel::Info));
        assert!(filter.admits(LogLevel::Warning));
        assert!(filter.admits(LogLevel::Error));
        assert!(filter.admits(LogLevel::Fatal));
    }

    fn arb_level() -> impl Strategy<Value = LogLevel> {
        prop::sample::select(LogLevel::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_admits_matches_ordering(threshold in arb_level(), level in arb_level()) {
            let filter = LevelFilter::new(threshold);
            prop_assert_eq!(filter.admits(level), level >= threshold);
            prop_assert_eq!(filter.admits(level), level.is_at_least(threshold));
        }

        #[test]
        fn prop_display_parses_back(level in arb_level()) {
            let parsed: LogLevel = level.as_str().parse().expect("parse display name");
            prop_assert_eq!(parsed, level);
        }
    }
}
