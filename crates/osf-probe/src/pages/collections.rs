//! Provider-branded collections pages.
//!
//! Without a provider these pages have no URL and verify on identity alone.

use crate::locator::Selector;
use crate::page_object::{collection_url, elements, provider_page, verify_branded, Page};
use crate::pages::navbars::CollectionsNavbar;
use crate::result::ProbeResult;
use async_trait::async_trait;

provider_page! {
    /// Collection discover/search page
    CollectionDiscoverPage, navbar: CollectionsNavbar
}

impl CollectionDiscoverPage {
    elements! {
        loading_indicator: Selector::css(".ball-scale");
    }
}

#[async_trait]
impl Page for CollectionDiscoverPage {
    const IDENTITY: Selector = Selector::css("div[data-test-provider-branding]");

    fn url(&self) -> Option<String> {
        let provider = self.provider.as_ref()?;
        Some(collection_url(&self.session.settings().osf_home, &provider.id, "discover"))
    }

    async fn verify(&self) -> ProbeResult<bool> {
        verify_branded(self, self.provider(), self.navbar().title()).await
    }
}

provider_page! {
    /// Multi-section form adding a project to a collection
    CollectionSubmitPage, navbar: CollectionsNavbar
}

impl CollectionSubmitPage {
    elements! {
        project_selector: Selector::css("span[class=\"ember-power-select-placeholder\"]");
        project_help_text: Selector::css(".ember-power-select-option--search-message");
        project_selector_project: Selector::css(".ember-power-select-option");
        license_dropdown_trigger: Selector::class_name("ember-basic-dropdown-trigger");
        first_license_option: Selector::css(".ember-power-select-options > li:nth-child(1)");
        description_textbox: Selector::css("textarea[name=\"description\"]");
        tags_input: Selector::class_name("emberTagInput-input");
        project_metadata_save: Selector::css("[data-test-project-metadata-save-button]");
        project_contributors_continue: Selector::css("[data-test-submit-section-continue]");
        type_dropdown_trigger: Selector::class_name("ember-basic-dropdown-trigger");
        first_type_option: Selector::css(".ember-power-select-options > li:nth-child(1)");
        collection_metadata_continue: Selector::css("[data-test-submit-section-continue]");
        add_to_collection_button: Selector::css("[data-test-collections-submit-submit-button]");
        modal_add_to_collection_button: Selector::css(
            "[data-test-collection-submission-confirmation-modal-add-button]",
        );
    }
}

#[async_trait]
impl Page for CollectionSubmitPage {
    const IDENTITY: Selector = Selector::css("div[data-test-collections-submit-sections]");

    fn url(&self) -> Option<String> {
        let provider = self.provider.as_ref()?;
        Some(collection_url(&self.session.settings().osf_home, &provider.id, "submit"))
    }

    async fn verify(&self) -> ProbeResult<bool> {
        verify_branded(self, self.provider(), self.navbar().title()).await
    }
}
