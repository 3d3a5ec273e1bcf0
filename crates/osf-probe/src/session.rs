//! Browser session handle.

use crate::config::{Settings, Timeouts};
use crate::driver::{Cookie, Driver, SharedDriver};
use crate::locator::{Element, ElementGroup, Selector};
use crate::result::ProbeResult;
use crate::wait::{wait_for, WaitOptions, WaitResult};
use std::sync::Arc;
use std::time::Duration;

/// Driver plus the run's settings
///
/// Cloning is cheap; page objects each hold a clone. One session drives one
/// browser, strictly sequentially.
#[derive(Debug, Clone)]
pub struct Session {
    driver: SharedDriver,
    settings: Arc<Settings>,
}

impl Session {
    /// Create a session
    #[must_use]
    pub fn new(driver: SharedDriver, settings: Settings) -> Self {
        Self::with_shared(driver, Arc::new(settings))
    }

    /// Create a session over settings shared with other sessions
    #[must_use]
    pub const fn with_shared(driver: SharedDriver, settings: Arc<Settings>) -> Self {
        Self { driver, settings }
    }

    /// The driver
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// The settings
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Timeout constants
    #[must_use]
    pub fn timeouts(&self) -> &Timeouts {
        &self.settings.timeouts
    }

    /// Bind a selector to this session
    #[must_use]
    pub const fn element(&self, selector: Selector) -> Element<'_> {
        Element::new(self, selector)
    }

    /// Bind a group selector to this session
    #[must_use]
    pub const fn group(&self, selector: Selector) -> ElementGroup<'_> {
        ElementGroup::new(self, selector)
    }

    /// Navigate to URL
    pub async fn navigate(&self, url: &str) -> ProbeResult<()> {
        tracing::debug!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Current URL
    pub async fn current_url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    /// Go back in history
    pub async fn back(&self) -> ProbeResult<()> {
        self.driver.back().await
    }

    /// Set a cookie on the current origin
    pub async fn add_cookie(&self, name: &str, value: &str) -> ProbeResult<()> {
        self.driver.add_cookie(Cookie::new(name, value)).await
    }

    /// Close the browser
    pub async fn close(&self) -> ProbeResult<()> {
        self.driver.close().await
    }

    fn wait_options(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::from_timeouts(self.timeouts(), timeout)
    }

    /// Wait until the current URL contains `fragment`
    pub async fn wait_for_url_contains(
        &self,
        fragment: &str,
        timeout: Duration,
    ) -> ProbeResult<WaitResult> {
        let driver = self.driver();
        wait_for(
            self.wait_options(timeout),
            format!("url to contain {fragment}"),
            move || async move {
                driver
                    .current_url()
                    .await
                    .map(|url| url.contains(fragment))
            },
        )
        .await
    }

    /// Wait until the current URL differs from `from`
    pub async fn wait_for_url_change(
        &self,
        from: &str,
        timeout: Duration,
    ) -> ProbeResult<WaitResult> {
        let driver = self.driver();
        wait_for(
            self.wait_options(timeout),
            format!("url to change from {from}"),
            move || async move { driver.current_url().await.map(|url| url != from) },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::result::ProbeError;

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_url_contains() {
        let driver = Arc::new(MockDriver::new());
        let session = Session::new(driver.clone(), Settings::default());
        session.navigate("https://staging.osf.io/dashboard").await.unwrap();
        let result = session
            .wait_for_url_contains("/dashboard", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(result.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_url_change_times_out() {
        let driver = Arc::new(MockDriver::new());
        let session = Session::new(driver.clone(), Settings::default());
        session.navigate("https://staging.osf.io/").await.unwrap();
        let err = session
            .wait_for_url_change("https://staging.osf.io/", Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { ms: 2_000, .. }));
    }

    #[tokio::test]
    async fn test_cookie_recorded() {
        let driver = Arc::new(MockDriver::new());
        let session = Session::new(driver.clone(), Settings::default());
        session.add_cookie("metadataFeaturePopover", "1").await.unwrap();
        assert_eq!(driver.cookies()[0], Cookie::new("metadataFeaturePopover", "1"));
    }
}
