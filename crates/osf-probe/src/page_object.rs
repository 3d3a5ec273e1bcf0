//! Page Object Model support.
//!
//! A page object is a session plus its context (provider, node guid, draft
//! id). Element accessors are generated from const selector tables with
//! [`elements!`] and [`groups!`]; every call binds a fresh lazy reference, so
//! nothing resolved is ever cached on the page.
//!
//! ```ignore
//! page! {
//!     /// CAS sign-in form
//!     LoginPage
//! }
//!
//! impl LoginPage {
//!     elements! {
//!         username_input: Selector::id("username");
//!         submit_button: Selector::id("submitBtn");
//!     }
//! }
//!
//! impl Page for LoginPage {
//!     const IDENTITY: Selector = Selector::id("login");
//!     fn url(&self) -> Option<String> { /* ... */ }
//! }
//! ```

use crate::locator::{Element, ElementGroup, ResolvedElement, Selector};
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// TRAITS
// =============================================================================

/// Anything bound to a session: pages, navbars, modals
pub trait Component: Send + Sync {
    /// The session this object drives
    fn session(&self) -> &Session;
}

/// A page reachable by URL or identified by its content
#[async_trait]
pub trait Page: Component {
    /// Element whose presence proves the page landed
    const IDENTITY: Selector;

    /// Page name for messages
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Absolute URL, a pure function of settings and context
    ///
    /// `None` for pages only reachable through a flow (two-factor prompt,
    /// CAS exception pages).
    fn url(&self) -> Option<String> {
        None
    }

    /// Identity element reference
    fn identity(&self) -> Element<'_> {
        self.session().element(Self::IDENTITY)
    }

    /// Whether `current` satisfies this page's location rule
    fn location_matches(&self, current: &str) -> bool {
        self.url()
            .map_or(true, |expected| url_matches(&expected, current))
    }

    /// Side effects required before the page is loaded or checked
    async fn prepare(&self) -> ProbeResult<()> {
        Ok(())
    }

    /// Location rule and identity element, nothing page-specific
    async fn verify_identity(&self) -> ProbeResult<bool> {
        let current = self.session().current_url().await?;
        if !self.location_matches(&current) {
            tracing::warn!(page = self.name(), url = %current, "location does not match");
            return Ok(false);
        }
        let present = self.identity().appears().await?;
        if present {
            tracing::info!(page = self.name(), "page verified");
        } else {
            tracing::warn!(page = self.name(), url = %current, "identity element missing");
        }
        Ok(present)
    }

    /// Whether the session is on this page
    async fn verify(&self) -> ProbeResult<bool> {
        self.verify_identity().await
    }

    /// Fail with [`ProbeError::PageVerification`] unless [`verify`](Self::verify) holds
    async fn ensure_verified(&self) -> ProbeResult<()> {
        if self.verify().await? {
            return Ok(());
        }
        Err(ProbeError::PageVerification {
            page: self.name().to_string(),
            url: self.session().current_url().await?,
        })
    }

    /// Navigate to [`url`](Self::url) and verify
    async fn goto(&self) -> ProbeResult<()> {
        let url = self.url().ok_or_else(|| ProbeError::Navigation {
            url: String::new(),
            message: format!("{} has no URL", self.name()),
        })?;
        self.prepare().await?;
        tracing::info!(page = self.name(), %url, "goto");
        self.session().navigate(&url).await?;
        self.ensure_verified().await
    }

    /// Finish construction, verifying when asked
    async fn checked(self, verify: bool) -> ProbeResult<Self>
    where
        Self: Sized,
    {
        self.prepare().await?;
        if verify {
            self.ensure_verified().await?;
        }
        Ok(self)
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Branding/tenant context for collections and registries pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// URL identifier
    pub id: String,
    /// Display name shown in the navbar
    pub name: String,
}

impl Provider {
    /// Create a provider
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Read `{ "id": .., "attributes": { "name": .. } }` as served by the API
    pub fn from_api(value: &serde_json::Value) -> ProbeResult<Self> {
        #[derive(Deserialize)]
        struct Attributes {
            name: String,
        }
        #[derive(Deserialize)]
        struct Record {
            id: String,
            attributes: Attributes,
        }
        let record = Record::deserialize(value)?;
        Ok(Self::new(record.id, record.attributes.name))
    }

    /// Whether this is the default OSF provider
    #[must_use]
    pub fn is_osf(&self) -> bool {
        self.id == "osf"
    }
}

// =============================================================================
// URL RULES
// =============================================================================

/// `{osf_home}/collections/{provider_id}/{addition}`
#[must_use]
pub fn collection_url(osf_home: &str, provider_id: &str, addition: &str) -> String {
    format!(
        "{}/collections/{provider_id}/{addition}",
        osf_home.trim_end_matches('/')
    )
}

/// `{osf_home}/registries/[{provider_id}/]{addition}`, the provider segment
/// omitted for OSF itself
#[must_use]
pub fn registries_url(osf_home: &str, provider: Option<&Provider>, addition: &str) -> String {
    let mut url = format!("{}/registries/", osf_home.trim_end_matches('/'));
    if let Some(provider) = provider.filter(|p| !p.is_osf()) {
        url.push_str(&provider.id);
        url.push('/');
    }
    url.push_str(addition);
    url
}

/// `{osf_home}/{guid}/{addition}`
#[must_use]
pub fn guid_url(osf_home: &str, guid: &str, addition: &str) -> String {
    format!("{}/{guid}/{addition}", osf_home.trim_end_matches('/'))
}

/// Prefix match ignoring a trailing slash on the expected URL
#[must_use]
pub fn url_matches(expected: &str, current: &str) -> bool {
    current.starts_with(expected.trim_end_matches('/'))
}

/// Host (and port) part of a URL
#[must_use]
pub fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// Whether two URLs share a host
#[must_use]
pub fn same_host(a: &str, b: &str) -> bool {
    host_of(a) == host_of(b)
}

// =============================================================================
// SHARED PAGE BEHAVIOUR
// =============================================================================

/// Identity check plus the provider's name in the navbar title
///
/// Without a provider only the identity check applies. A missing title
/// counts as a failed check.
pub async fn verify_branded<P>(
    page: &P,
    provider: Option<&Provider>,
    title: Element<'_>,
) -> ProbeResult<bool>
where
    P: Page + ?Sized,
{
    if !page.verify_identity().await? {
        return Ok(false);
    }
    let Some(provider) = provider else {
        return Ok(true);
    };
    match title.text().await {
        Ok(text) => {
            let branded = text.contains(&provider.name);
            if !branded {
                tracing::warn!(provider = %provider.name, title = %text, "branding mismatch");
            }
            Ok(branded)
        }
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// First member whose text equals `text`
pub async fn find_by_text<'s>(
    group: &ElementGroup<'s>,
    text: &str,
) -> ProbeResult<Option<ResolvedElement<'s>>> {
    for member in group.all().await? {
        if member.text().await? == text {
            return Ok(Some(member));
        }
    }
    Ok(None)
}

/// Click the first option whose text equals `selection`
///
/// Options after the match are not inspected. When nothing matches nothing
/// is clicked and no error is raised; the return value says which happened.
pub async fn select_from_dropdown_listbox(
    options: &ElementGroup<'_>,
    selection: &str,
) -> ProbeResult<bool> {
    match find_by_text(options, selection).await? {
        Some(option) => {
            option.click().await?;
            Ok(true)
        }
        None => {
            tracing::debug!(selection, "no dropdown option matched");
            Ok(false)
        }
    }
}

// =============================================================================
// MACROS
// =============================================================================

/// Declare a session-bound struct with `new` and a [`Component`] impl
macro_rules! component {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            session: $crate::session::Session,
        }

        impl $name {
            /// Bind to a session
            #[must_use]
            pub fn new(session: &$crate::session::Session) -> Self {
                Self {
                    session: session.clone(),
                }
            }
        }

        impl $crate::page_object::Component for $name {
            fn session(&self) -> &$crate::session::Session {
                &self.session
            }
        }
    };
}

/// [`component!`] plus an `open(session, verify)` constructor
macro_rules! page {
    ($(#[$meta:meta])* $name:ident) => {
        $crate::page_object::component! {
            $(#[$meta])*
            $name
        }

        impl $name {
            /// Bind to a session, verifying the current page when asked
            pub async fn open(
                session: &$crate::session::Session,
                verify: bool,
            ) -> $crate::result::ProbeResult<Self> {
                $crate::page_object::Page::checked(Self::new(session), verify).await
            }
        }
    };
}

/// Page scoped to an optional [`Provider`], with a branded navbar
macro_rules! provider_page {
    ($(#[$meta:meta])* $name:ident, navbar: $navbar:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            session: $crate::session::Session,
            provider: Option<$crate::page_object::Provider>,
        }

        impl $name {
            /// Bind to a session and provider
            #[must_use]
            pub fn new(
                session: &$crate::session::Session,
                provider: Option<$crate::page_object::Provider>,
            ) -> Self {
                Self {
                    session: session.clone(),
                    provider,
                }
            }

            /// Bind, verifying the current page when asked
            pub async fn open(
                session: &$crate::session::Session,
                provider: Option<$crate::page_object::Provider>,
                verify: bool,
            ) -> $crate::result::ProbeResult<Self> {
                $crate::page_object::Page::checked(Self::new(session, provider), verify).await
            }

            /// Provider context
            #[must_use]
            pub const fn provider(&self) -> Option<&$crate::page_object::Provider> {
                self.provider.as_ref()
            }

            /// Branded navbar
            #[must_use]
            pub fn navbar(&self) -> $navbar {
                $navbar::new(&self.session)
            }
        }

        impl $crate::page_object::Component for $name {
            fn session(&self) -> &$crate::session::Session {
                &self.session
            }
        }
    };
}

/// Generate lazy [`Element`] accessors from const selectors
macro_rules! elements {
    ($($(#[$meta:meta])* $name:ident: $selector:expr;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> $crate::locator::Element<'_> {
                const SELECTOR: $crate::locator::Selector = $selector;
                $crate::page_object::Component::session(self).element(SELECTOR)
            }
        )*
    };
}

/// Generate lazy [`ElementGroup`] accessors from const selectors
macro_rules! groups {
    ($($(#[$meta:meta])* $name:ident: $selector:expr;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> $crate::locator::ElementGroup<'_> {
                const SELECTOR: $crate::locator::Selector = $selector;
                $crate::page_object::Component::session(self).group(SELECTOR)
            }
        )*
    };
}

pub(crate) use component;
pub(crate) use elements;
pub(crate) use groups;
pub(crate) use page;
pub(crate) use provider_page;
