//! osf-probe: page objects and end-to-end scenarios for the OSF web application
//!
//! Scenarios drive a browser through OSF (CAS sign-in, dashboard, meetings,
//! collections, registries) using page objects whose element references
//! resolve lazily on every access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    OSF-PROBE Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenarios  │    │ Workflows  │    │ Pages      │            │
//! │   │ (registry) │───►│ (journeys) │───►│ (selector  │            │
//! │   │            │    │            │    │  tables)   │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Chromium   │◄───│ Driver     │◄───│ Element /  │            │
//! │   │ or Mock    │    │ (trait)    │    │ Group refs │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use osf_probe::{LoginPage, Page, Session, Settings};
//!
//! let session = Session::new(driver, Settings::from_env()?);
//! let login = LoginPage::new(&session);
//! login.goto().await?;
//! login.submit_button().click().await?;
//! assert_eq!(login.login_error_message().text().await?, "Email is required.");
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod result;

/// Chromium backend and selector translation
pub mod browser;

/// Settings: domains, accounts, timeouts, browser capabilities
pub mod config;

/// The browser-automation seam
pub mod driver;

/// Selectors and lazy element references
pub mod locator;

/// Scripted in-memory driver for tests
///
/// Deterministic stand-in for a browser: routes, click reactions and timed
/// appearance, all on tokio's clock.
pub mod mock;

/// Page and component object support
pub mod page_object;

/// OSF page objects
pub mod pages;

/// Registered end-to-end scenarios
pub mod scenarios;

/// Browser session handle
pub mod session;

/// Bounded polling waits
#[allow(clippy::missing_errors_doc)]
pub mod wait;

/// Multi-step user journeys
pub mod workflows;

pub use assertion::{
    assert_text_eq, assert_url_contains, assert_url_eq, ensure, Assertion, AssertionResult,
};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{
    capabilities_table, Account, BrowserSettings, Capability, Credentials, Domain, Settings,
    Timeouts,
};
pub use driver::{Cookie, Driver, ElementHandle, SharedDriver};
pub use locator::{Element, ElementGroup, ResolvedElement, Selector, Strategy, Wait};
pub use mock::{MockDom, MockDriver, MockElement};
pub use page_object::{select_from_dropdown_listbox, Component, Page, Provider};
pub use pages::*;
pub use result::{ProbeError, ProbeResult};
pub use scenarios::{Marker, Registry, RunReport, Scenario, ScenarioOutcome};
pub use session::Session;
pub use wait::{WaitOptions, WaitResult};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    mod reexport_tests {
        use super::*;

        #[test]
        fn test_session_over_shared_mock() {
            let driver: SharedDriver = Arc::new(MockDriver::new());
            let session = Session::new(driver, Settings::default());
            assert_eq!(session.settings().domain, Domain::Stage1);
        }

        #[test]
        fn test_selector_display() {
            assert_eq!(Selector::id("fm1").to_string(), "id `fm1`");
        }

        #[test]
        fn test_registry_default_is_all() {
            assert_eq!(
                Registry::default().scenarios().len(),
                Registry::all().scenarios().len()
            );
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_probe_error_display() {
            let err = ProbeError::StillLoading {
                what: "Dashboard page".to_string(),
            };
            assert_eq!(err.to_string(), "Dashboard page is still loading");
        }

        #[test]
        fn test_probe_error_timeout() {
            let err = ProbeError::Timeout {
                what: "url to change".to_string(),
                ms: 5000,
            };
            assert!(err.to_string().contains("5000"));
        }
    }
}
