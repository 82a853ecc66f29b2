//! Assertions for scenario validation.

use std::fmt::Debug;

use crate::price::{Price, PriceTolerance};
use crate::result::{ProbeError, ProbeResult};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Prefix the failure message with context
    #[must_use]
    pub fn context(self, what: &str) -> Self {
        if self.passed {
            self
        } else {
            Self::fail(format!("{what}: {}", self.message))
        }
    }

    /// `AssertionFailed` unless passed
    pub fn into_result(self) -> ProbeResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(ProbeError::AssertionFailed {
                message: self.message,
            })
        }
    }
}

/// Assertion helpers
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug + ?Sized>(expected: &T, actual: &T) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{haystack}' to contain '{needle}'"))
        }
    }

    /// Assert a string contains a substring, ignoring case and surrounding space
    #[must_use]
    pub fn contains_ignore_case(haystack: &str, needle: &str) -> AssertionResult {
        if haystack
            .trim()
            .to_lowercase()
            .contains(&needle.trim().to_lowercase())
        {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected '{}' to contain '{needle}' (case-insensitive)",
                haystack.trim()
            ))
        }
    }

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a collection has expected length
    #[must_use]
    pub fn has_length<T>(collection: &[T], expected: usize) -> AssertionResult {
        if collection.len() == expected {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected length {expected}, got {}",
                collection.len()
            ))
        }
    }

    /// Assert a collection is not empty
    #[must_use]
    pub fn not_empty<T>(collection: &[T]) -> AssertionResult {
        if collection.is_empty() {
            AssertionResult::fail("expected at least one element, got none")
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert two prices agree under a tolerance policy
    #[must_use]
    pub fn price_matches(
        expected: Price,
        actual: Price,
        tolerance: PriceTolerance,
    ) -> AssertionResult {
        if tolerance.accepts(expected, actual) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected {expected}, got {actual} (tolerance {tolerance})"
            ))
        }
    }

    /// First failure among `results`, or a pass
    #[must_use]
    pub fn all(results: impl IntoIterator<Item = AssertionResult>) -> AssertionResult {
        results
            .into_iter()
            .find(|r| !r.passed)
            .unwrap_or_else(AssertionResult::pass)
    }
}
