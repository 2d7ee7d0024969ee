//! Process-wide log setup
//!
//! Installs a `tracing` fmt subscriber once at startup. `RUST_LOG` takes
//! precedence over the configured level.

use tracing_subscriber::EnvFilter;

use crate::core::error::{CrewError, Result};

/// Level used for `--debug`: this crate at debug, dependencies at info
pub const DEBUG_LEVEL: &str = "info,verbal_crew=debug";

/// Build the filter used by [`init`]
pub fn filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| CrewError::config(format!("Invalid log level '{}': {}", level, e))),
    }
}

/// Install the global subscriber. Call before the first log line.
pub fn init(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_target(false)
        .try_init()
        .map_err(|e| CrewError::Other(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_directives() {
        if std::env::var("RUST_LOG").is_err() {
            assert!(filter("debug").is_ok());
            assert!(filter("info,verbal_crew=trace").is_ok());
        }
    }

    #[test]
    fn test_debug_level_is_scoped_to_crate() {
        let directives: Vec<&str> = DEBUG_LEVEL.split(',').collect();
        assert!(directives.contains(&"info"));
        assert!(directives.contains(&"verbal_crew=debug"));
        assert!(!directives.contains(&"debug"));
        assert!(EnvFilter::try_new(DEBUG_LEVEL).is_ok());
    }
}
