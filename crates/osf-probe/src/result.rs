//! Result and error types for osf-probe.

use thiserror::Error;

/// Result type for osf-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A selector's bounded poll expired with zero matches
    #[error("Element not found: {selector} (waited {waited_ms}ms)")]
    ElementNotFound {
        /// Human readable selector description
        selector: String,
        /// Time spent polling in milliseconds
        waited_ms: u64,
    },

    /// An observed value did not match the expected literal
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// The institution logo could not be found inside a create-project modal
    #[error("Institution logo for {institution} not present in modal")]
    InstitutionLogoMissing {
        /// Institution name used for the lookup
        institution: String,
    },

    /// A page did not verify after construction or navigation
    #[error("Unexpected page structure: expected {page} at {url}")]
    PageVerification {
        /// Page type name
        page: String,
        /// URL the session was on
        url: String,
    },

    /// A condition wait expired
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// Condition description
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A loading indicator outlived its wait
    #[error("{what} is still loading")]
    StillLoading {
        /// What was loading
        what: String,
    },

    /// A project list did not have an entry at the requested position
    #[error("Unable to find a project at position {position}")]
    ProjectNotFound {
        /// 1-based position requested
        position: usize,
    },

    /// A previously resolved handle no longer exists in the page
    #[error("Stale element handle: {id}")]
    StaleElement {
        /// Handle identifier
        id: String,
    },

    /// The backend cannot evaluate this selector in this context
    #[error("Unsupported selector: {message}")]
    UnsupportedSelector {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Generic driver failure
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

    /// Configuration error
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

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is the "not found" condition of a selector poll
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}
