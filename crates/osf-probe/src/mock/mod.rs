//! Mock driver for unit and scenario testing
//!
//! [`MockDriver`] implements [`Driver`] over a scripted in-memory document.
//! Routes map URL prefixes to builders that populate a fresh [`MockDom`] on
//! every navigation; click reactions registered on the document mutate it or
//! request another navigation. Element timing (`appear_after`,
//! `vanish_after`) runs on tokio's clock, so paused-clock tests see the same
//! waits a real browser would impose.
//!
//! ## Example
//!
//! ```rust,ignore
//! let driver = MockDriver::new().with_route("https://accounts.osf.io/login", |_, dom| {
//!     dom.add(MockElement::new(Selector::id("submitBtn")));
//! });
//! ```

mod dom;

pub use dom::{MockDom, MockElement, Reaction, RouteBuilder};

use crate::driver::{Cookie, Driver, ElementHandle};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Upper bound on navigations chained from one action
const MAX_REDIRECTS: usize = 10;

#[derive(Default)]
struct MockState {
    dom: MockDom,
    routes: Vec<(String, RouteBuilder)>,
    history: Vec<String>,
    cookies: Vec<Cookie>,
    calls: Vec<String>,
    closed: bool,
}

impl MockState {
    fn build(&mut self, url: &str) {
        self.dom.reset(url);
        let route = self
            .routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, builder)| Arc::clone(builder));
        if let Some(builder) = route {
            builder(url, &mut self.dom);
        }
    }

    fn load(&mut self, url: &str) -> ProbeResult<()> {
        let mut next = Some(url.to_string());
        let mut hops = 0;
        while let Some(url) = next {
            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(ProbeError::Navigation {
                    url,
                    message: "too many redirects".to_string(),
                });
            }
            self.history.push(url.clone());
            self.build(&url);
            next = self.dom.take_pending_navigation();
        }
        Ok(())
    }
}

/// Mock driver for unit testing
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver").finish_non_exhaustive()
    }
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a route builder for URLs starting with `prefix`
    #[must_use]
    pub fn with_route<F>(self, prefix: impl Into<String>, builder: F) -> Self
    where
        F: Fn(&str, &mut MockDom) + Send + Sync + 'static,
    {
        self.add_route(prefix, builder);
        self
    }

    /// Register a route builder on a shared driver
    pub fn add_route<F>(&self, prefix: impl Into<String>, builder: F)
    where
        F: Fn(&str, &mut MockDom) + Send + Sync + 'static,
    {
        self.state().routes.push((prefix.into(), Arc::new(builder)));
    }

    /// Mutate the current document directly
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        f(&mut self.state().dom)
    }

    /// Get call history
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(method))
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Every URL loaded so far, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Cookies set so far
    #[must_use]
    pub fn cookies(&self) -> Vec<Cookie> {
        self.state().cookies.clone()
    }

    /// Whether `close` was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn record(state: &mut MockState, call: String) {
        state.calls.push(call);
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("navigate:{url}"));
        state.load(url)
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.state().dom.url().to_string())
    }

    async fn back(&self) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, "back".to_string());
        if state.history.len() < 2 {
            return Ok(());
        }
        state.history.pop();
        if let Some(previous) = state.history.last().cloned() {
            state.build(&previous);
        }
        Ok(())
    }

    async fn find_elements(
        &self,
        selector: &Selector,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Vec<ElementHandle>> {
        self.state().dom.query(selector, scope)
    }

    async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("click:{}", element.id));
        if !state.dom.is_enabled(&element.id)? {
            return Ok(());
        }
        let reactions = state.dom.reactions_for(&element.id)?;
        if reactions.is_empty() {
            if let Some(href) = state.dom.attribute(&element.id, "href")? {
                return state.load(&href);
            }
        }
        for reaction in reactions {
            reaction(&mut state.dom);
        }
        match state.dom.take_pending_navigation() {
            Some(url) => state.load(&url),
            None => Ok(()),
        }
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("send_keys:{}:{text}", element.id));
        state.dom.append_value(&element.id, text)
    }

    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("clear:{}", element.id));
        state.dom.clear_value(&element.id)
    }

    async fn select_index(&self, element: &ElementHandle, index: usize) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("select:{}:{index}", element.id));
        state.dom.set_selected_index(&element.id, index)?;
        for reaction in state.dom.reactions_for(&element.id)? {
            reaction(&mut state.dom);
        }
        match state.dom.take_pending_navigation() {
            Some(url) => state.load(&url),
            None => Ok(()),
        }
    }

    async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let mut state = self.state();
        Self::record(&mut state, format!("text:{}", element.id));
        state.dom.text(&element.id)
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> ProbeResult<Option<String>> {
        self.state().dom.attribute(&element.id, name)
    }

    async fn property(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
        self.state().dom.property(&element.id, name)
    }

    async fn css_value(&self, element: &ElementHandle, name: &str) -> ProbeResult<String> {
        self.state().dom.css_value(&element.id, name)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        self.state().dom.is_enabled(&element.id)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        self.state().dom.is_displayed(&element.id)
    }

    async fn add_cookie(&self, cookie: Cookie) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, format!("add_cookie:{}", cookie.name));
        state.cookies.push(cookie);
        Ok(())
    }

    async fn close(&self) -> ProbeResult<()> {
        let mut state = self.state();
        Self::record(&mut state, "close".to_string());
        state.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: Selector = Selector::link_text("Sign up");
    const BUTTON: Selector = Selector::id("go");

    fn site() -> MockDriver {
        MockDriver::new()
            .with_route("https://osf.test/", |_, dom| {
                dom.add(MockElement::new(LINK).href("https://osf.test/register/"));
                dom.add(MockElement::new(BUTTON));
                dom.on_click_navigate(BUTTON, "https://osf.test/dashboard");
            })
            .with_route("https://osf.test/register/", |_, dom| {
                dom.add(MockElement::new(Selector::id("signUp")));
            })
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_longest_prefix_route() {
            let driver = site();
            driver.navigate("https://osf.test/register/").await.unwrap();
            let found = driver
                .find_elements(&Selector::id("signUp"), None)
                .await
                .unwrap();
            assert_eq!(found.len(), 1);
            assert!(driver.find_elements(&LINK, None).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_link_click_follows_href() {
            let driver = site();
            driver.navigate("https://osf.test/").await.unwrap();
            let link = driver.find_elements(&LINK, None).await.unwrap().remove(0);
            driver.click(&link).await.unwrap();
            assert_eq!(
                driver.current_url().await.unwrap(),
                "https://osf.test/register/"
            );
        }

        #[tokio::test]
        async fn test_reaction_navigation_and_back() {
            let driver = site();
            driver.navigate("https://osf.test/").await.unwrap();
            let button = driver.find_elements(&BUTTON, None).await.unwrap().remove(0);
            driver.click(&button).await.unwrap();
            assert_eq!(
                driver.current_url().await.unwrap(),
                "https://osf.test/dashboard"
            );
            driver.back().await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), "https://osf.test/");
            assert!(driver.was_called("back"));
        }

        #[tokio::test]
        async fn test_redirect_loop_is_bounded() {
            let driver = MockDriver::new().with_route("https://loop.test/", |url, dom| {
                dom.navigate_to(url.to_string());
            });
            let err = driver.navigate("https://loop.test/").await.unwrap_err();
            assert!(matches!(err, ProbeError::Navigation { .. }));
        }
    }

    mod element_tests {
        use super::*;

        #[tokio::test]
        async fn test_disabled_click_is_inert() {
            let driver = MockDriver::new();
            let id = driver.with_dom(|dom| {
                let id = dom.add(MockElement::new(BUTTON).disabled());
                dom.on_click(BUTTON, |dom| dom.set_text(&BUTTON, "clicked"));
                id
            });
            let handle = ElementHandle::new(id, "id `go`");
            driver.click(&handle).await.unwrap();
            assert_eq!(driver.text(&handle).await.unwrap(), "");
        }

        #[tokio::test]
        async fn test_stale_after_navigation() {
            let driver = site();
            driver.navigate("https://osf.test/").await.unwrap();
            let button = driver.find_elements(&BUTTON, None).await.unwrap().remove(0);
            driver.navigate("https://osf.test/").await.unwrap();
            assert!(matches!(
                driver.text(&button).await,
                Err(ProbeError::StaleElement { .. })
            ));
        }
    }
}
