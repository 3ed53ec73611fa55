//! Process-wide logger installed exactly once.
//!
//! The first successful [`init`] builds the logger and installs it for the
//! rest of the process. Later calls never rebuild it, and their configuration
//! is dropped. Callers racing on [`init`] block until the winner finishes.

use once_cell::sync::OnceCell;
use oq_config::Config;
use tracing::debug;

use crate::error::Result;
use crate::level::LevelFilter;
use crate::logger::Logger;

static GLOBAL_LOGGER: OnceCell<Logger> = OnceCell::new();

static DISABLED_LOGGER: Logger = Logger::disabled();

/// Builds the global logger from `config` and installs it, once.
///
/// The level name is checked on every call, so an unrecognized severity is
/// always reported, even after a logger has been installed. An installed
/// logger is never replaced; subsequent valid calls return `Ok(())` without
/// doing anything. If construction fails, nothing is installed and a later
/// call may try again.
///
/// # Errors
///
/// Returns [`LogError::InvalidLevel`](crate::LogError::InvalidLevel) for an
/// unrecognized level name and
/// [`LogError::InvalidConfig`](crate::LogError::InvalidConfig) for an empty
/// service name or filename, reported only to the caller that ran
/// construction.
pub fn init(config: &Config, service: impl Into<String>) -> Result<()> {
    LevelFilter::parse(&config.logging.level)?;

    let mut constructed = false;
    let logger = GLOBAL_LOGGER.get_or_try_init(|| {
        constructed = true;
        Logger::new(&config.logging, service)
    })?;

    if !constructed {
        debug!(
            service = logger.service(),
            "global logger already initialized; ignoring new configuration"
        );
    }
    Ok(())
}

/// Returns the installed logger, or `None` before a successful [`init`].
#[must_use]
pub fn get_logger() -> Option<&'static Logger> {
    GLOBAL_LOGGER.get()
}

/// Returns the installed logger, or a disabled one before a successful [`init`].
///
/// Records logged through the disabled logger are dropped.
#[must_use]
pub fn logger() -> &'static Logger {
    GLOBAL_LOGGER.get().unwrap_or(&DISABLED_LOGGER)
}

/// Returns true once a logger has been installed.
#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

// Unit tests here never install a logger; installation is covered by the
// integration tests, each of which runs in its own process.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::types::LogContext;
    use oq_config::LoggingConfig;

    #[test]
    fn uninitialized_accessors() {
        assert!(get_logger().is_none());
        assert!(!is_initialized());

        let fallback = logger();
        assert_eq!(fallback.service(), "");
        fallback.info("dropped", None, LogContext::new());
    }

    #[test]
    fn invalid_level_does_not_install() {
        let config = Config::with_logging(LoggingConfig::new("unused.log").with_level("chatty"));
        let result = init(&config, "questionnaire");

        assert!(matches!(result, Err(LogError::InvalidLevel(_))));
        assert!(get_logger().is_none());
    }
}
