//! Error types for the CLI

use storefront_probe::ProbeError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Filter and tags matched nothing in the catalog
    #[error("No scenario selected (filter: {filter}, tags: {tags})")]
    NoScenarios {
        /// Filter as given, or "-"
        filter: String,
        /// Tags as given, comma separated, or "-"
        tags: String,
    },

    /// Real browser requested without the `browser` feature
    #[error("Browser support not enabled. Rebuild with --features browser, or pass --mock")]
    BrowserUnavailable,

    /// At least one selected scenario did not pass
    #[error("{failed} of {total} scenario(s) failed")]
    ScenariosFailed {
        /// Failed count
        failed: usize,
        /// Selected count
        total: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Library error
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Rendering the effective configuration failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Process exit code: 1 for failed scenarios, 2 for everything that
    /// kept the suite from running
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ScenariosFailed { .. } => 1,
            _ => 2,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad config"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_scenarios_failed() {
        let err = CliError::ScenariosFailed {
            failed: 2,
            total: 9,
        };
        assert_eq!(err.to_string(), "2 of 9 scenario(s) failed");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_no_scenarios_message() {
        let err = CliError::NoScenarios {
            filter: "nothing".into(),
            tags: "-".into(),
        };
        assert!(err.to_string().contains("filter: nothing"));
    }

    #[test]
    fn test_probe_error_from() {
        let err: CliError = ProbeError::Config {
            message: "jobs must be at least 1".into(),
        }
        .into();
        assert!(err.to_string().contains("jobs must be at least 1"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }
}
