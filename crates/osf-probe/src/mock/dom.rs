//! Scripted in-memory document for [`MockDriver`](super::MockDriver).

use crate::driver::ElementHandle;
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Callback run when a matching element is clicked
pub type Reaction = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// Builds the document for a URL
pub type RouteBuilder = Arc<dyn Fn(&str, &mut MockDom) + Send + Sync>;

/// Element description for the mock document
#[derive(Debug, Clone)]
pub struct MockElement {
    selectors: Vec<Selector>,
    text: String,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, String>,
    css: BTreeMap<String, String>,
    enabled: bool,
    displayed: bool,
    key: Option<String>,
    parent: Option<String>,
    appear_after: Option<Duration>,
    vanish_after: Option<Duration>,
}

impl MockElement {
    /// Element matched by `selector`
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selectors: vec![selector],
            text: String::new(),
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            css: BTreeMap::new(),
            enabled: true,
            displayed: true,
            key: None,
            parent: None,
            appear_after: None,
            vanish_after: None,
        }
    }

    /// Also matched by `selector`
    #[must_use]
    pub fn matching(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Rendered text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// HTML attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Link target; clicking the element navigates there unless a reaction
    /// is registered for it
    #[must_use]
    pub fn href(self, url: impl Into<String>) -> Self {
        self.attr("href", url)
    }

    /// DOM property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Computed CSS value
    #[must_use]
    pub fn css(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.css.insert(name.into(), value.into());
        self
    }

    /// Render disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Render but hide
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Name other elements can nest under with [`child_of`](Self::child_of)
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Nest under the element keyed `parent`
    #[must_use]
    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Attach only after `delay` has passed since insertion
    #[must_use]
    pub const fn appear_after(mut self, delay: Duration) -> Self {
        self.appear_after = Some(delay);
        self
    }

    /// Detach once `delay` has passed since insertion
    #[must_use]
    pub const fn vanish_after(mut self, delay: Duration) -> Self {
        self.vanish_after = Some(delay);
        self
    }

    fn matches(&self, selector: &Selector) -> bool {
        self.selectors.iter().any(|s| s.same_target(selector))
    }
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    added_at: Instant,
    element: MockElement,
}

impl Node {
    fn attached(&self, now: Instant) -> bool {
        let age = now.saturating_duration_since(self.added_at);
        let appeared = self.element.appear_after.map_or(true, |d| age >= d);
        let vanished = self.element.vanish_after.is_some_and(|d| age >= d);
        appeared && !vanished
    }
}

/// The current document of a [`MockDriver`](super::MockDriver)
pub struct MockDom {
    url: String,
    generation: u64,
    next_id: u64,
    nodes: Vec<Node>,
    reactions: Vec<(Selector, Reaction)>,
    pending_navigation: Option<String>,
}

impl fmt::Debug for MockDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDom")
            .field("url", &self.url)
            .field("generation", &self.generation)
            .field("nodes", &self.nodes.len())
            .field("reactions", &self.reactions.len())
            .finish()
    }
}

impl Default for MockDom {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            generation: 0,
            next_id: 0,
            nodes: Vec::new(),
            reactions: Vec::new(),
            pending_navigation: None,
        }
    }
}

impl MockDom {
    /// URL the document was loaded from
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Insert an element and return its handle id
    pub fn add(&mut self, element: MockElement) -> String {
        self.next_id += 1;
        let id = format!("g{}-e{}", self.generation, self.next_id);
        self.nodes.push(Node {
            id: id.clone(),
            added_at: Instant::now(),
            element,
        });
        id
    }

    /// Remove every element matching `selector`; returns how many went
    pub fn remove(&mut self, selector: &Selector) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| !n.element.matches(selector));
        before - self.nodes.len()
    }

    /// Replace the text of every element matching `selector`
    pub fn set_text(&mut self, selector: &Selector, text: &str) {
        for node in self.nodes.iter_mut().filter(|n| n.element.matches(selector)) {
            node.element.text = text.to_string();
        }
    }

    /// Enable or disable every element matching `selector`
    pub fn set_enabled(&mut self, selector: &Selector, enabled: bool) {
        for node in self.nodes.iter_mut().filter(|n| n.element.matches(selector)) {
            node.element.enabled = enabled;
        }
    }

    /// Current `value` of the first element matching `selector`
    #[must_use]
    pub fn value_of(&self, selector: &Selector) -> String {
        self.nodes
            .iter()
            .find(|n| n.element.matches(selector))
            .and_then(|n| n.element.properties.get("value").cloned())
            .unwrap_or_default()
    }

    /// Run `reaction` whenever an element matching `selector` is clicked
    pub fn on_click<F>(&mut self, selector: Selector, reaction: F)
    where
        F: Fn(&mut Self) + Send + Sync + 'static,
    {
        self.reactions.push((selector, Arc::new(reaction)));
    }

    /// Navigate to `url` whenever an element matching `selector` is clicked
    pub fn on_click_navigate(&mut self, selector: Selector, url: impl Into<String>) {
        let url = url.into();
        self.on_click(selector, move |dom| dom.navigate_to(url.clone()));
    }

    /// Request a navigation once the current callback returns
    pub fn navigate_to(&mut self, url: impl Into<String>) {
        self.pending_navigation = Some(url.into());
    }

    pub(crate) fn take_pending_navigation(&mut self) -> Option<String> {
        self.pending_navigation.take()
    }

    /// Drop the document and start an empty one at `url`
    pub(crate) fn reset(&mut self, url: &str) {
        self.generation += 1;
        self.next_id = 0;
        self.url = url.to_string();
        self.nodes.clear();
        self.reactions.clear();
        self.pending_navigation = None;
    }

    fn in_subtree(&self, node: &Node, ancestor_key: &str) -> bool {
        let mut parent = node.element.parent.as_deref();
        let mut depth = 0;
        while let Some(key) = parent {
            if key == ancestor_key {
                return true;
            }
            depth += 1;
            if depth > self.nodes.len() {
                return false;
            }
            parent = self
                .nodes
                .iter()
                .find(|n| n.element.key.as_deref() == Some(key))
                .and_then(|n| n.element.parent.as_deref());
        }
        false
    }

    pub(crate) fn query(
        &self,
        selector: &Selector,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Vec<ElementHandle>> {
        let now = Instant::now();
        let scope_key = match scope {
            Some(handle) => match self.node(&handle.id)?.element.key.clone() {
                Some(key) => Some(key),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.attached(now) && n.element.matches(selector))
            .filter(|n| {
                scope_key
                    .as_deref()
                    .map_or(true, |key| self.in_subtree(n, key))
            })
            .map(|n| ElementHandle::new(n.id.clone(), selector.to_string()))
            .collect())
    }

    fn node(&self, id: &str) -> ProbeResult<&Node> {
        let now = Instant::now();
        self.nodes
            .iter()
            .find(|n| n.id == id && n.attached(now))
            .ok_or_else(|| ProbeError::StaleElement { id: id.to_string() })
    }

    fn node_mut(&mut self, id: &str) -> ProbeResult<&mut Node> {
        let now = Instant::now();
        self.nodes
            .iter_mut()
            .find(|n| n.id == id && n.attached(now))
            .ok_or_else(|| ProbeError::StaleElement { id: id.to_string() })
    }

    pub(crate) fn reactions_for(&self, id: &str) -> ProbeResult<Vec<Reaction>> {
        let node = self.node(id)?;
        Ok(self
            .reactions
            .iter()
            .filter(|(selector, _)| node.element.matches(selector))
            .map(|(_, reaction)| Arc::clone(reaction))
            .collect())
    }

    pub(crate) fn text(&self, id: &str) -> ProbeResult<String> {
        Ok(self.node(id)?.element.text.clone())
    }

    pub(crate) fn attribute(&self, id: &str, name: &str) -> ProbeResult<Option<String>> {
        Ok(self.node(id)?.element.attributes.get(name).cloned())
    }

    pub(crate) fn property(&self, id: &str, name: &str) -> ProbeResult<Option<String>> {
        let element = &self.node(id)?.element;
        if name == "disabled" {
            return Ok(Some((!element.enabled).to_string()));
        }
        Ok(element.properties.get(name).cloned())
    }

    pub(crate) fn css_value(&self, id: &str, name: &str) -> ProbeResult<String> {
        Ok(self
            .node(id)?
            .element
            .css
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    pub(crate) fn is_enabled(&self, id: &str) -> ProbeResult<bool> {
        Ok(self.node(id)?.element.enabled)
    }

    pub(crate) fn is_displayed(&self, id: &str) -> ProbeResult<bool> {
        Ok(self.node(id)?.element.displayed)
    }

    pub(crate) fn append_value(&mut self, id: &str, text: &str) -> ProbeResult<()> {
        let element = &mut self.node_mut(id)?.element;
        element
            .properties
            .entry("value".to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }

    pub(crate) fn set_selected_index(&mut self, id: &str, index: usize) -> ProbeResult<()> {
        let element = &mut self.node_mut(id)?.element;
        element
            .properties
            .insert("selectedIndex".to_string(), index.to_string());
        Ok(())
    }

    pub(crate) fn clear_value(&mut self, id: &str) -> ProbeResult<()> {
        let element = &mut self.node_mut(id)?.element;
        element
            .properties
            .insert("value".to_string(), String::new());
        Ok(())
    }
}
