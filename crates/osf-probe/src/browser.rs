//! Browser control over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`ChromiumDriver`] implements
//! [`Driver`](crate::driver::Driver) on chromiumoxide: it launches a local
//! Chromium (or attaches to a running one through its DevTools websocket)
//! and drives a single tab.
//!
//! CDP only searches by CSS or XPath, so every [`Selector`] is first
//! translated into a [`Query`]. That translation is always compiled so it can
//! be tested without a browser.

use crate::locator::{Selector, Strategy};

/// A selector in a form CDP can search with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `querySelectorAll` pattern
    Css(String),
    /// XPath expression, evaluated against the document
    XPath(String),
}

/// Translate a selector into a CSS or XPath query
#[must_use]
pub fn to_query(selector: &Selector) -> Query {
    let pattern = selector.pattern.as_ref();
    match selector.strategy {
        Strategy::Css => Query::Css(pattern.to_string()),
        Strategy::Id => Query::Css(format!("[id={}]", css_string(pattern))),
        Strategy::Name => Query::Css(format!("[name={}]", css_string(pattern))),
        Strategy::ClassName => Query::Css(format!("[class~={}]", css_string(pattern))),
        Strategy::XPath => Query::XPath(pattern.to_string()),
        Strategy::LinkText => Query::XPath(format!(
            "//a[normalize-space(.)={}]",
            xpath_literal(pattern)
        )),
    }
}

/// Double-quoted CSS string
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// XPath 1.0 string literal; XPath has no escapes, so text holding both
/// quote kinds is spliced with `concat()`
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{part}\""))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// DOM property value as the string [`Driver::property`](crate::driver::Driver::property) reports
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn property_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Handle id for a DOM node; stable for as long as the node lives
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn node_handle_id(backend_node_id: i64) -> String {
    format!("node-{backend_node_id}")
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::{node_handle_id, property_string, to_query, Query};
    use crate::config::Settings;
    use crate::driver::{Cookie, Driver, ElementHandle};
    use crate::locator::Selector;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::network::CookieParam;
    use chromiumoxide::element::Element as CdpElement;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::fmt;
    use tokio::sync::{Mutex, MutexGuard};

    const IS_ENABLED: &str = "function() { return !this.disabled; }";
    const IS_DISPLAYED: &str = "function() { \
        const rect = this.getBoundingClientRect(); \
        const style = window.getComputedStyle(this); \
        return rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden'; \
    }";
    const CLEAR: &str = "function() { \
        this.value = ''; \
        this.dispatchEvent(new Event('input', { bubbles: true })); \
    }";

    fn driver_error(e: impl fmt::Display) -> ProbeError {
        ProbeError::driver(e.to_string())
    }

    fn launch_error(e: impl fmt::Display) -> ProbeError {
        ProbeError::BrowserLaunch {
            message: e.to_string(),
        }
    }

    type Registry = HashMap<String, CdpElement>;

    fn lookup<'a>(elements: &'a Registry, handle: &ElementHandle) -> ProbeResult<&'a CdpElement> {
        elements.get(&handle.id).ok_or_else(|| ProbeError::StaleElement {
            id: handle.id.clone(),
        })
    }

    /// Chromium tab driven over CDP
    ///
    /// Resolved nodes are kept in a registry keyed by their backend node id,
    /// so polling the same node replaces its entry instead of adding one.
    /// The registry is dropped on every navigation and handles from an
    /// earlier page report [`ProbeError::StaleElement`].
    pub struct ChromiumDriver {
        browser: Mutex<CdpBrowser>,
        page: CdpPage,
        elements: Mutex<Registry>,
        handler: tokio::task::JoinHandle<()>,
        attached: bool,
    }

    impl fmt::Debug for ChromiumDriver {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ChromiumDriver")
                .field("attached", &self.attached)
                .finish_non_exhaustive()
        }
    }

    impl ChromiumDriver {
        /// Launch Chromium, or attach to `browser.cdp_endpoint` when set
        ///
        /// The window size comes from the configured build's capabilities;
        /// an unknown build fails before anything is launched.
        pub async fn launch(settings: &Settings) -> ProbeResult<Self> {
            let endpoint = settings.browser.cdp_endpoint.as_deref();
            let (browser, mut handler) = match endpoint {
                Some(endpoint) => {
                    tracing::info!(endpoint, "attaching to browser");
                    CdpBrowser::connect(endpoint).await.map_err(launch_error)?
                }
                None => {
                    let config = Self::config(settings)?;
                    tracing::info!(build = %settings.build, "launching chromium");
                    CdpBrowser::launch(config).await.map_err(launch_error)?
                }
            };

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = match browser.new_page("about:blank").await {
                Ok(page) => page,
                Err(e) => {
                    handler.abort();
                    return Err(launch_error(e));
                }
            };

            Ok(Self {
                browser: Mutex::new(browser),
                page,
                elements: Mutex::new(HashMap::new()),
                handler,
                attached: endpoint.is_some(),
            })
        }

        fn config(settings: &Settings) -> ProbeResult<CdpConfig> {
            let capability = settings.desired_capabilities()?;
            let options = &settings.browser;
            let mut builder = CdpConfig::builder();
            if !options.headless {
                builder = builder.with_head();
            }
            if !options.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(path) = &options.executable_path {
                builder = builder.chrome_executable(path);
            }
            if let Some((width, height)) = capability.window_size() {
                builder = builder.window_size(width, height);
            }
            builder.build().map_err(launch_error)
        }

        async fn registry(&self) -> MutexGuard<'_, Registry> {
            self.elements.lock().await
        }

        async fn forget_elements(&self) {
            self.registry().await.clear();
        }

        async fn call(&self, handle: &ElementHandle, function: &str) -> ProbeResult<Option<serde_json::Value>> {
            let elements = self.registry().await;
            let node = lookup(&elements, handle)?;
            let returns = node
                .call_js_fn(function, false)
                .await
                .map_err(driver_error)?;
            Ok(returns.result.value)
        }

        async fn call_bool(&self, handle: &ElementHandle, function: &str) -> ProbeResult<bool> {
            Ok(self
                .call(handle, function)
                .await?
                .and_then(|v| v.as_bool())
                .unwrap_or(false))
        }

        async fn xpath_count(&self, xpath: &str) -> ProbeResult<u64> {
            let script = format!(
                "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                serde_json::to_string(xpath)?
            );
            let result = self.page.evaluate(script).await.map_err(driver_error)?;
            Ok(result.into_value::<u64>().unwrap_or(0))
        }
    }

    #[async_trait]
    impl Driver for ChromiumDriver {
        async fn navigate(&self, url: &str) -> ProbeResult<()> {
            self.forget_elements().await;
            self.page
                .goto(url)
                .await
                .map_err(|e| ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> ProbeResult<String> {
            Ok(self
                .page
                .url()
                .await
                .map_err(driver_error)?
                .unwrap_or_default())
        }

        async fn back(&self) -> ProbeResult<()> {
            self.forget_elements().await;
            self.page
                .evaluate("window.history.back()")
                .await
                .map_err(driver_error)?;
            Ok(())
        }

        async fn find_elements(
            &self,
            selector: &Selector,
            scope: Option<&ElementHandle>,
        ) -> ProbeResult<Vec<ElementHandle>> {
            let found = match (to_query(selector), scope) {
                (Query::Css(css), None) => self.page.find_elements(css).await,
                (Query::Css(css), Some(parent)) => {
                    let elements = self.registry().await;
                    lookup(&elements, parent)?.find_elements(css).await
                }
                (Query::XPath(xpath), None) => {
                    if self.xpath_count(&xpath).await? == 0 {
                        return Ok(Vec::new());
                    }
                    self.page.find_xpaths(xpath).await
                }
                (Query::XPath(_), Some(_)) => {
                    return Err(ProbeError::UnsupportedSelector {
                        message: format!("{selector} cannot be scoped to a parent element"),
                    })
                }
            }
            .map_err(driver_error)?;

            let mut elements = self.registry().await;
            let description = selector.to_string();
            Ok(found
                .into_iter()
                .map(|node| {
                    let id = node_handle_id(*node.backend_node_id.inner());
                    elements.insert(id.clone(), node);
                    ElementHandle::new(id, description.clone())
                })
                .collect())
        }

        async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
            let elements = self.registry().await;
            lookup(&elements, element)?
                .click()
                .await
                .map_err(driver_error)?;
            Ok(())
        }

        async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
            let elements = self.registry().await;
            let node = lookup(&elements, element)?;
            node.focus().await.map_err(driver_error)?;
            node.type_str(text).await.map_err(driver_error)?;
            Ok(())
        }

        async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
            self.call(element, CLEAR).await.map(drop)
        }

        async fn select_index(&self, element: &ElementHandle, index: usize) -> ProbeResult<()> {
            let function = format!(
                "function() {{ \
                    this.selectedIndex = {index}; \
                    this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                }}"
            );
            self.call(element, &function).await.map(drop)
        }

        async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
            let elements = self.registry().await;
            Ok(lookup(&elements, element)?
                .inner_text()
                .await
                .map_err(driver_error)?
                .unwrap_or_default())
        }

        async fn attribute(
            &self,
            element: &ElementHandle,
            name: &str,
        ) -> ProbeResult<Option<String>> {
            let elements = self.registry().await;
            lookup(&elements, element)?
                .attribute(name)
                .await
                .map_err(driver_error)
        }

        async fn property(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
            let elements = self.registry().await;
            let value = lookup(&elements, element)?
                .property(name)
                .await
                .map_err(driver_error)?;
            Ok(value.and_then(property_string))
        }

        async fn css_value(&self, element: &ElementHandle, name: &str) -> ProbeResult<String> {
            let function = format!(
                "function() {{ return window.getComputedStyle(this).getPropertyValue({}); }}",
                serde_json::to_string(name)?
            );
            Ok(self
                .call(element, &function)
                .await?
                .and_then(property_string)
                .unwrap_or_default())
        }

        async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
            self.call_bool(element, IS_ENABLED).await
        }

        async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
            self.call_bool(element, IS_DISPLAYED).await
        }

        async fn add_cookie(&self, cookie: Cookie) -> ProbeResult<()> {
            self.page
                .set_cookie(CookieParam::new(cookie.name, cookie.value))
                .await
                .map_err(driver_error)?;
            Ok(())
        }

        async fn close(&self) -> ProbeResult<()> {
            self.forget_elements().await;
            if self.attached {
                self.page.clone().close().await.map_err(driver_error)?;
            } else {
                self.browser.lock().await.close().await.map_err(driver_error)?;
            }
            self.handler.abort();
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_unknown_build_fails_before_launch() {
            let mut settings = Settings::default();
            settings.build = "netscape".to_string();
            let err = ChromiumDriver::launch(&settings).await.unwrap_err();
            assert!(matches!(err, ProbeError::Config { .. }));
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
