//! Result and error types for storefront probing.

use thiserror::Error;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can abort a scenario
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Selector resolved to zero matches within the wait window
    #[error("Element not found: {selector} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// Selector description
        selector: String,
        /// Wait window in milliseconds
        timeout_ms: u64,
    },

    /// Several elements matched and no ordinal was given
    #[error("Ambiguous selector: {selector} matched {count} elements, an ordinal is required")]
    AmbiguousSelector {
        /// Selector description
        selector: String,
        /// Number of matches
        count: usize,
    },

    /// Element stayed hidden or covered for the whole wait window
    #[error("Element not interactable: {selector} (waited {timeout_ms}ms)")]
    NotInteractable {
        /// Selector description
        selector: String,
        /// Wait window in milliseconds
        timeout_ms: u64,
    },

    /// An intercepted network call did not resolve in time
    #[error("Intercept {method} {pattern} not resolved within {timeout_ms}ms")]
    InterceptTimeout {
        /// HTTP method
        method: String,
        /// URL pattern
        pattern: String,
        /// Wait window in milliseconds
        timeout_ms: u64,
    },

    /// Still on the login route after submitting credentials
    #[error("Login failed for {email}: still at {url}")]
    LoginFailed {
        /// Email used for the attempt
        email: String,
        /// URL observed after submitting
        url: String,
    },

    /// A business rule did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// An observed HTTP response carried an unexpected status
    #[error("Unexpected status from {url}: expected {expected}, got {actual}")]
    NetworkUnexpectedStatus {
        /// Expected status (or class, e.g. "2xx")
        expected: String,
        /// Observed status
        actual: u16,
        /// Request URL
        url: String,
    },

    /// Selector descriptor rejected at construction
    #[error("Invalid selector: {message}")]
    InvalidSelector {
        /// Error message
        message: String,
    },

    /// Displayed price could not be parsed
    #[error("Cannot parse price from {input:?}")]
    PriceParse {
        /// Raw text observed in the page
        input: String,
    },

    /// Price arithmetic left the representable range
    #[error("Price overflow: {operation}")]
    PriceOverflow {
        /// The operation that overflowed
        operation: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Driver-level failure (connection, evaluation)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Fixture could not be loaded
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Whether this is a business-rule mismatch rather than an
    /// infrastructure failure
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::AssertionFailed { .. } | Self::NetworkUnexpectedStatus { .. }
        )
    }

    /// Short machine-readable kind, used in reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ElementNotFound { .. } => "ElementNotFound",
            Self::AmbiguousSelector { .. } => "AmbiguousSelector",
            Self::NotInteractable { .. } => "NotInteractable",
            Self::InterceptTimeout { .. } => "InterceptTimeout",
            Self::LoginFailed { .. } => "LoginFailed",
            Self::AssertionFailed { .. } => "AssertionFailed",
            Self::NetworkUnexpectedStatus { .. } => "NetworkUnexpectedStatus",
            Self::InvalidSelector { .. } => "InvalidSelector",
            Self::PriceParse { .. } => "PriceParse",
            Self::PriceOverflow { .. } => "PriceOverflow",
            Self::Navigation { .. } => "Navigation",
            Self::Driver { .. } => "Driver",
            Self::BrowserLaunch { .. } => "BrowserLaunch",
            Self::Fixture { .. } => "Fixture",
            Self::Config { .. } => "Config",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Yaml(_) => "Yaml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_is_business_failure() {
        let err = ProbeError::assertion("total mismatch");
        assert!(err.is_assertion());
        assert_eq!(err.kind(), "AssertionFailed");
        assert!(err.to_string().contains("total mismatch"));
    }

    #[test]
    fn test_unexpected_status_is_business_failure() {
        let err = ProbeError::NetworkUnexpectedStatus {
            expected: "422".to_string(),
            actual: 201,
            url: "https://api.example.com/favorites".to_string(),
        };
        assert!(err.is_assertion());
        assert!(err.to_string().contains("got 201"));
    }

    #[test]
    fn test_element_not_found_is_infrastructure() {
        let err = ProbeError::ElementNotFound {
            selector: "#btn-add-to-cart".to_string(),
            timeout_ms: 4000,
        };
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("#btn-add-to-cart"));
        assert!(err.to_string().contains("4000ms"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ProbeError = io_err.into();
        assert_eq!(err.kind(), "Io");
    }
}
