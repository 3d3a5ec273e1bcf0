//! Navigation bars embedded in the branded page families.

use crate::locator::{Element, Selector, Strategy};
use crate::page_object::{component, elements, Component};

component! {
    /// Branded navbar over every collections page
    CollectionsNavbar
}

impl CollectionsNavbar {
    elements! {
        /// Provider title, carries the branding name
        title: Selector::css("[data-test-nav-title]");
        discover_link: Selector::css("a[data-test-nav-discover-link]");
        submit_link: Selector::css("a[data-test-nav-submit-link]");
        sign_in_button: Selector::css("a[data-test-sign-in-button]");
    }
}

component! {
    /// Branded navbar over every registries page
    RegistriesNavbar
}

impl RegistriesNavbar {
    elements! {
        /// Provider title, carries the branding name
        title: Selector::css("[data-test-brand-link]");
        add_new_link: Selector::css("a[data-test-nav-add-new-link]");
        help_link: Selector::css("a[data-test-nav-help-link]");
        sign_in_button: Selector::css("a[data-test-sign-in-button]");
    }
}

/// Destinations in the meetings primary dropdown, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryDestination {
    /// OSF home
    Home,
    /// Preprints landing
    Preprints,
    /// Registries landing
    Registries,
    /// Meetings landing
    Meetings,
}

impl PrimaryDestination {
    /// Every destination, in menu order
    pub const ALL: [Self; 4] = [Self::Home, Self::Preprints, Self::Registries, Self::Meetings];

    /// 1-based position in the dropdown
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Home => 1,
            Self::Preprints => 2,
            Self::Registries => 3,
            Self::Meetings => 4,
        }
    }

    /// Path under `osf_home` the destination lands on
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Preprints => "/preprints/",
            Self::Registries => "/registries/",
            Self::Meetings => "/meetings",
        }
    }
}

/// Donation page the meetings navbar links to
pub const DONATE_URL: &str = "https://cos.io/donate-to-cos/";

component! {
    /// Legacy OSF navbar shown on meetings pages
    MeetingsNavbar
}

impl MeetingsNavbar {
    elements! {
        title: Selector::css("#navbarScope .navbar-title");
        /// Opens the primary destination dropdown
        primary_toggle: Selector::css("#primary-navigation > span");
        support_link: Selector::css("#secondary-navigation > ul > li:nth-child(2) > a");
        donate_link: Selector::css("#secondary-navigation > ul > li.navbar-donate-button > a");
    }

    /// Entry for `destination` in the opened primary dropdown
    #[must_use]
    pub fn primary_item(&self, destination: PrimaryDestination) -> Element<'_> {
        let pattern = format!(
            "#navbarScope > div > div.navbar-header > div.dropdown.primary-nav.open > ul > li:nth-child({}) > a > b",
            destination.position()
        );
        self.session().element(Selector::dynamic(Strategy::Css, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::mock::{MockDriver, MockElement};
    use crate::session::Session;
    use std::sync::Arc;

    #[test]
    fn test_destinations_in_menu_order() {
        let positions: Vec<_> = PrimaryDestination::ALL.iter().map(|d| d.position()).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert_eq!(PrimaryDestination::Meetings.path(), "/meetings");
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_item_selector() {
        let driver = Arc::new(MockDriver::new());
        let session = Session::new(driver.clone(), Settings::default());
        let navbar = MeetingsNavbar::new(&session);
        let item = navbar.primary_item(PrimaryDestination::Preprints);
        assert!(item.selector().pattern.ends_with("li:nth-child(2) > a > b"));

        driver.with_dom(|dom| {
            dom.add(MockElement::new(item.selector().clone()).text("PREPRINTS"));
        });
        assert_eq!(item.text().await.unwrap(), "PREPRINTS");
    }
}
