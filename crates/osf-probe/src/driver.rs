//! Driver - Abstract Browser Automation Trait
//!
//! Everything above this module (element references, page objects,
//! workflows) talks to the browser only through [`Driver`]. Two
//! implementations ship with the crate:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Driver (async trait, &self methods)                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────┐   ┌──────────────────────────┐  │
//! │  │  ChromiumDriver         │   │  MockDriver              │  │
//! │  │  feature = "browser"    │   │  scripted in-memory DOM  │  │
//! │  │  CDP via chromiumoxide  │   │  for tests               │  │
//! │  └─────────────────────────┘   └──────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers never wait. `find_elements` is a single probe of the current
//! document; polling lives in [`crate::wait`].

use crate::locator::Selector;
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque reference to a node the driver resolved
///
/// Handles are only valid until the next navigation or re-render. Callers
/// should keep the [`Selector`] and re-resolve rather than hold on to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned identifier
    pub id: String,
    /// Description of the selector that produced this handle
    pub selector: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selector: selector.into(),
        }
    }
}

/// Browser cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
}

impl Cookie {
    /// Create a cookie
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Abstract driver trait for browser automation
///
/// Methods take `&self` so one driver can be shared by every page object in
/// a session. Implementations use interior mutability.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Navigate to URL
    async fn navigate(&self, url: &str) -> ProbeResult<()>;

    /// Get current URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// Go back in history
    async fn back(&self) -> ProbeResult<()>;

    /// All nodes matching `selector` right now, searched under `scope` when
    /// given and the whole document otherwise
    async fn find_elements(
        &self,
        selector: &Selector,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Vec<ElementHandle>>;

    /// Click element
    async fn click(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Type text into element
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Clear an input's value
    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Choose the option at `index` of a `<select>` and fire `change`
    async fn select_index(&self, element: &ElementHandle, index: usize) -> ProbeResult<()>;

    /// Rendered text
    async fn text(&self, element: &ElementHandle) -> ProbeResult<String>;

    /// HTML attribute
    async fn attribute(&self, element: &ElementHandle, name: &str)
        -> ProbeResult<Option<String>>;

    /// DOM property (e.g. `value`)
    async fn property(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>>;

    /// Computed CSS value
    async fn css_value(&self, element: &ElementHandle, name: &str) -> ProbeResult<String>;

    /// Whether the element accepts interaction
    async fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Whether the element is rendered and visible
    async fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Set a cookie on the current origin
    async fn add_cookie(&self, cookie: Cookie) -> ProbeResult<()>;

    /// Close the browser
    async fn close(&self) -> ProbeResult<()>;
}

/// Driver shared by a session and its page objects
pub type SharedDriver = Arc<dyn Driver>;
