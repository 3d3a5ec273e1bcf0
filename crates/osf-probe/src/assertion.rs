//! Assertions comparing observed page state to expected literals.

use crate::locator::Element;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use std::fmt::Debug;

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

    /// `Err(AssertionFailed)` unless passed
    pub fn into_result(self) -> ProbeResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(ProbeError::assertion(self.message))
        }
    }
}

/// Assertion helpers for testing
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

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a condition is false
    #[must_use]
    pub fn is_false(condition: bool, message: &str) -> AssertionResult {
        Self::is_true(!condition, message)
    }
}

/// Element text must equal `expected` exactly
pub async fn assert_text_eq(element: &Element<'_>, expected: &str) -> ProbeResult<()> {
    let actual = element.text().await?;
    Assertion::equals(expected, actual.as_str())
        .into_result()
        .map_err(|e| context(e, &element.selector().to_string()))
}

/// Current URL must equal `expected` exactly
pub async fn assert_url_eq(session: &Session, expected: &str) -> ProbeResult<()> {
    let actual = session.current_url().await?;
    Assertion::equals(expected, actual.as_str())
        .into_result()
        .map_err(|e| context(e, "current url"))
}

/// Current URL must contain `fragment`
pub async fn assert_url_contains(session: &Session, fragment: &str) -> ProbeResult<()> {
    let actual = session.current_url().await?;
    Assertion::contains(&actual, fragment).into_result()
}

/// Condition must hold
pub fn ensure(condition: bool, message: &str) -> ProbeResult<()> {
    Assertion::is_true(condition, message).into_result()
}

fn context(error: ProbeError, what: &str) -> ProbeError {
    match error {
        ProbeError::AssertionFailed { message } => {
            ProbeError::assertion(format!("{what}: {message}"))
        }
        other => other,
    }
}
