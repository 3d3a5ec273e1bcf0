//! Selectors and lazily re-resolving element references.
//!
//! A [`Selector`] is inert const data. Binding it to a [`Session`] yields an
//! [`Element`] or [`ElementGroup`], which touch the page only when an accessor
//! is awaited. Every accessor resolves again from scratch through a bounded
//! poll, so a reference stays usable across re-renders and navigations.
//!
//! ```text
//!   Selector ──bind──► Element ──resolve()──► poll(find_elements) ──► ElementHandle
//!      const           lazy        each access       bounded              short-lived
//! ```

use crate::driver::ElementHandle;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use crate::wait::{poll, WaitOptions};
use futures::future::BoxFuture;
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Delay between keystrokes in [`Element::send_keys_deliberately`]
pub const KEYSTROKE_DELAY_MS: u64 = 50;

// =============================================================================
// SELECTOR
// =============================================================================

/// How a selector pattern is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Element id
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Exact visible text of a link
    LinkText,
    /// Single class name
    ClassName,
    /// `name` attribute
    Name,
}

impl Strategy {
    /// Short name used in messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::LinkText => "link text",
            Self::ClassName => "class name",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeout override carried by a selector
///
/// Symbolic values are resolved against [`Timeouts`](crate::config::Timeouts)
/// when the reference is accessed, so one const selector table serves every
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wait {
    /// The configured default
    #[default]
    Default,
    /// The configured quick timeout
    Quick,
    /// The configured long timeout
    Long,
    /// The configured very long timeout
    VeryLong,
    /// A fixed duration
    Exact(Duration),
}

/// Strategy, pattern and timeout override
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Strategy
    pub strategy: Strategy,
    /// Pattern interpreted by the strategy
    pub pattern: Cow<'static, str>,
    /// Timeout override
    pub wait: Wait,
}

impl Selector {
    /// Create a selector from a static pattern
    #[must_use]
    pub const fn new(strategy: Strategy, pattern: &'static str) -> Self {
        Self {
            strategy,
            pattern: Cow::Borrowed(pattern),
            wait: Wait::Default,
        }
    }

    /// Create a selector from a pattern computed at runtime
    #[must_use]
    pub fn dynamic(strategy: Strategy, pattern: impl Into<String>) -> Self {
        Self {
            strategy,
            pattern: Cow::Owned(pattern.into()),
            wait: Wait::Default,
        }
    }

    /// Create an id selector
    #[must_use]
    pub const fn id(pattern: &'static str) -> Self {
        Self::new(Strategy::Id, pattern)
    }

    /// Create a CSS selector
    #[must_use]
    pub const fn css(pattern: &'static str) -> Self {
        Self::new(Strategy::Css, pattern)
    }

    /// Create an XPath selector
    #[must_use]
    pub const fn xpath(pattern: &'static str) -> Self {
        Self::new(Strategy::XPath, pattern)
    }

    /// Create a link text selector
    #[must_use]
    pub const fn link_text(pattern: &'static str) -> Self {
        Self::new(Strategy::LinkText, pattern)
    }

    /// Create a class name selector
    #[must_use]
    pub const fn class_name(pattern: &'static str) -> Self {
        Self::new(Strategy::ClassName, pattern)
    }

    /// Create a `name` attribute selector
    #[must_use]
    pub const fn name(pattern: &'static str) -> Self {
        Self::new(Strategy::Name, pattern)
    }

    /// Override the timeout
    #[must_use]
    pub const fn with_wait(mut self, wait: Wait) -> Self {
        self.wait = wait;
        self
    }

    /// Whether two selectors address the same nodes, ignoring the timeout
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        self.strategy == other.strategy && self.pattern == other.pattern
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy, self.pattern)
    }
}

// =============================================================================
// ELEMENT REFERENCE
// =============================================================================

#[derive(Debug, Clone)]
enum Scope<'s> {
    Document,
    Parent(Box<Element<'s>>),
    Handle(ElementHandle),
}

/// Lazily resolved reference to a single element
#[derive(Debug, Clone)]
pub struct Element<'s> {
    session: &'s Session,
    selector: Selector,
    scope: Scope<'s>,
}

impl<'s> Element<'s> {
    pub(crate) const fn new(session: &'s Session, selector: Selector) -> Self {
        Self {
            session,
            selector,
            scope: Scope::Document,
        }
    }

    /// The selector this reference resolves
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The selector's timeout under the session's configuration
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.session.timeouts().resolve(self.selector.wait)
    }

    /// Child reference whose lookups are scoped to this element
    #[must_use]
    pub fn find(&self, child: Selector) -> Element<'s> {
        Element {
            session: self.session,
            selector: child,
            scope: Scope::Parent(Box::new(self.clone())),
        }
    }

    fn describe(&self) -> String {
        match &self.scope {
            Scope::Document => self.selector.to_string(),
            Scope::Parent(parent) => format!("{} within {}", self.selector, parent.describe()),
            Scope::Handle(handle) => format!("{} within {}", self.selector, handle.selector),
        }
    }

    fn options(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::from_timeouts(self.session.timeouts(), timeout)
    }

    fn scope_handle(&self) -> BoxFuture<'_, ProbeResult<Option<ElementHandle>>> {
        Box::pin(async move {
            match &self.scope {
                Scope::Document => Ok(None),
                Scope::Parent(parent) => parent.resolve().await.map(Some),
                Scope::Handle(handle) => Ok(Some(handle.clone())),
            }
        })
    }

    async fn first_within(&self, timeout: Duration) -> ProbeResult<Option<ElementHandle>> {
        let scope = self.scope_handle().await?;
        let scope = scope.as_ref();
        let driver = self.session.driver();
        let selector = &self.selector;
        poll(self.options(timeout), move || async move {
            driver
                .find_elements(selector, scope)
                .await
                .map(|found| found.into_iter().next())
        })
        .await
    }

    async fn gone_within(&self, timeout: Duration) -> ProbeResult<bool> {
        let scope = self.scope_handle().await?;
        let scope = scope.as_ref();
        let driver = self.session.driver();
        let selector = &self.selector;
        let gone = poll(self.options(timeout), move || async move {
            driver
                .find_elements(selector, scope)
                .await
                .map(|found| found.is_empty().then_some(()))
        })
        .await?;
        Ok(gone.is_some())
    }

    /// Poll until a match exists and return the first one
    ///
    /// Fails with [`ProbeError::ElementNotFound`] only after the selector's
    /// full timeout has elapsed.
    pub async fn resolve(&self) -> ProbeResult<ElementHandle> {
        let timeout = self.timeout();
        if let Some(handle) = self.first_within(timeout).await? {
            tracing::debug!(selector = %self.describe(), id = %handle.id, "resolved");
            return Ok(handle);
        }
        let waited_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        tracing::warn!(selector = %self.describe(), waited_ms, "element not found");
        Err(ProbeError::ElementNotFound {
            selector: self.describe(),
            waited_ms,
        })
    }

    async fn exists_within(&self, timeout: Duration) -> ProbeResult<bool> {
        match self.first_within(timeout).await {
            Ok(found) => Ok(found.is_some()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether a match shows up within the quick timeout
    pub async fn present(&self) -> ProbeResult<bool> {
        let quick = self.session.timeouts().quick();
        self.exists_within(quick).await
    }

    /// Whether a match shows up within the selector's own timeout
    pub async fn appears(&self) -> ProbeResult<bool> {
        self.exists_within(self.timeout()).await
    }

    /// Wait until nothing matches, bounded by the selector's timeout
    pub async fn absent(&self) -> ProbeResult<bool> {
        match self.gone_within(self.timeout()).await {
            Err(e) if e.is_not_found() => Ok(true),
            other => other,
        }
    }

    /// Wait out a transient indicator
    ///
    /// Waits up to the selector's timeout for the element to show, then up
    /// to the long timeout for it to go away. An indicator that never showed
    /// counts as gone.
    pub async fn here_then_gone(&self) -> ProbeResult<bool> {
        if !self.exists_within(self.timeout()).await? {
            tracing::debug!(selector = %self.describe(), "indicator never appeared");
            return Ok(true);
        }
        let long = self.session.timeouts().long();
        let gone = self.gone_within(long).await?;
        if !gone {
            tracing::warn!(selector = %self.describe(), "indicator still present");
        }
        Ok(gone)
    }

    /// Click
    pub async fn click(&self) -> ProbeResult<()> {
        let handle = self.resolve().await?;
        self.session.driver().click(&handle).await
    }

    /// Type text
    pub async fn send_keys(&self, text: &str) -> ProbeResult<()> {
        let handle = self.resolve().await?;
        self.session.driver().send_keys(&handle, text).await
    }

    /// Type text one character at a time
    pub async fn send_keys_deliberately(&self, text: &str) -> ProbeResult<()> {
        let handle = self.resolve().await?;
        let mut buf = [0_u8; 4];
        for ch in text.chars() {
            self.session
                .driver()
                .send_keys(&handle, ch.encode_utf8(&mut buf))
                .await?;
            tokio::time::sleep(Duration::from_millis(KEYSTROKE_DELAY_MS)).await;
        }
        Ok(())
    }

    /// Clear an input
    pub async fn clear(&self) -> ProbeResult<()> {
        let handle = self.resolve().await?;
        self.session.driver().clear(&handle).await
    }

    /// Choose an option of a `<select>` by position
    pub async fn select_index(&self, index: usize) -> ProbeResult<()> {
        let handle = self.resolve().await?;
        self.session.driver().select_index(&handle, index).await
    }

    /// Rendered text
    pub async fn text(&self) -> ProbeResult<String> {
        let handle = self.resolve().await?;
        self.session.driver().text(&handle).await
    }

    /// HTML attribute
    pub async fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        let handle = self.resolve().await?;
        self.session.driver().attribute(&handle, name).await
    }

    /// DOM property
    pub async fn property(&self, name: &str) -> ProbeResult<Option<String>> {
        let handle = self.resolve().await?;
        self.session.driver().property(&handle, name).await
    }

    /// Computed CSS value
    pub async fn css_value(&self, name: &str) -> ProbeResult<String> {
        let handle = self.resolve().await?;
        self.session.driver().css_value(&handle, name).await
    }

    /// Whether the element accepts interaction
    pub async fn is_enabled(&self) -> ProbeResult<bool> {
        let handle = self.resolve().await?;
        self.session.driver().is_enabled(&handle).await
    }

    /// Whether the element is visible
    pub async fn is_displayed(&self) -> ProbeResult<bool> {
        let handle = self.resolve().await?;
        self.session.driver().is_displayed(&handle).await
    }
}

// =============================================================================
// ELEMENT GROUP REFERENCE
// =============================================================================

/// Lazily resolved reference to every match of a selector
#[derive(Debug, Clone)]
pub struct ElementGroup<'s> {
    session: &'s Session,
    selector: Selector,
}

impl<'s> ElementGroup<'s> {
    pub(crate) const fn new(session: &'s Session, selector: Selector) -> Self {
        Self { session, selector }
    }

    /// The selector this group resolves
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Poll until at least one match exists, then return all of them in
    /// document order
    ///
    /// An empty list after the full timeout is a valid answer.
    pub async fn all(&self) -> ProbeResult<Vec<ResolvedElement<'s>>> {
        let timeout = self.session.timeouts().resolve(self.selector.wait);
        let driver = self.session.driver();
        let selector = &self.selector;
        let found = poll(
            WaitOptions::from_timeouts(self.session.timeouts(), timeout),
            move || async move {
                driver
                    .find_elements(selector, None)
                    .await
                    .map(|handles| (!handles.is_empty()).then_some(handles))
            },
        )
        .await?
        .unwrap_or_default();

        tracing::debug!(selector = %self.selector, count = found.len(), "group resolved");
        Ok(found
            .into_iter()
            .map(|handle| ResolvedElement::new(self.session, handle))
            .collect())
    }

    /// Number of matches
    pub async fn len(&self) -> ProbeResult<usize> {
        Ok(self.all().await?.len())
    }

    /// Whether the group resolves to nothing
    pub async fn is_empty(&self) -> ProbeResult<bool> {
        Ok(self.all().await?.is_empty())
    }

    /// Match at `index` (0-based)
    pub async fn nth(&self, index: usize) -> ProbeResult<Option<ResolvedElement<'s>>> {
        Ok(self.all().await?.into_iter().nth(index))
    }

    /// Visible text of every match, in order
    pub async fn texts(&self) -> ProbeResult<Vec<String>> {
        let mut texts = Vec::new();
        for member in self.all().await? {
            texts.push(member.text().await?);
        }
        Ok(texts)
    }
}

/// One member of an [`ElementGroup`] access
///
/// Holds a handle from a single resolution. Use it right away; after the page
/// changes, access the group again.
#[derive(Debug, Clone)]
pub struct ResolvedElement<'s> {
    session: &'s Session,
    handle: ElementHandle,
}

impl<'s> ResolvedElement<'s> {
    const fn new(session: &'s Session, handle: ElementHandle) -> Self {
        Self { session, handle }
    }

    /// The underlying handle
    #[must_use]
    pub const fn handle(&self) -> &ElementHandle {
        &self.handle
    }

    /// Child reference scoped to this member
    #[must_use]
    pub fn find(&self, child: Selector) -> Element<'s> {
        Element {
            session: self.session,
            selector: child,
            scope: Scope::Handle(self.handle.clone()),
        }
    }

    /// Rendered text
    pub async fn text(&self) -> ProbeResult<String> {
        self.session.driver().text(&self.handle).await
    }

    /// Click
    pub async fn click(&self) -> ProbeResult<()> {
        self.session.driver().click(&self.handle).await
    }

    /// HTML attribute
    pub async fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        self.session.driver().attribute(&self.handle, name).await
    }

    /// Computed CSS value
    pub async fn css_value(&self, name: &str) -> ProbeResult<String> {
        self.session.driver().css_value(&self.handle, name).await
    }

    /// Whether the member is visible
    pub async fn is_displayed(&self) -> ProbeResult<bool> {
        self.session.driver().is_displayed(&self.handle).await
    }
}
