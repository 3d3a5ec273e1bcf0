//! Registries: provider landing and discover pages, submitted registration
//! pages keyed by GUID, and the draft registration workflow.

use crate::locator::{ResolvedElement, Selector, Wait};
use crate::page_object::{
    elements, find_by_text, groups, guid_url, provider_page, registries_url,
    select_from_dropdown_listbox, Page,
};
use crate::pages::navbars::RegistriesNavbar;
use crate::result::ProbeResult;
use crate::session::Session;

/// Cookie that keeps the new-feature popover off submitted registrations
pub const FEATURE_POPOVER_COOKIE: (&str, &str) = ("metadataFeaturePopover", "1");

const WORMHOLE_OPTIONS: Selector =
    Selector::css("#ember-basic-dropdown-wormhole > div > ul > li>span");
const POWER_SELECT_OPTIONS: Selector =
    Selector::css("#ember-basic-dropdown-wormhole > div > ul >li.ember-power-select-option");

/// `{osf_home}/registries/drafts/{draft_id}/{addition}`
#[must_use]
pub fn draft_url(osf_home: &str, draft_id: &str, addition: &str) -> String {
    format!(
        "{}/registries/drafts/{draft_id}/{addition}",
        osf_home.trim_end_matches('/')
    )
}

/// Submitted registration page at `{osf_home}/{guid}/{addition}`
macro_rules! registration_page {
    ($(#[$meta:meta])* $name:ident, $addition:literal, $identity:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            session: Session,
            guid: String,
        }

        impl $name {
            /// Bind to a session and registration GUID
            #[must_use]
            pub fn new(session: &Session, guid: impl Into<String>) -> Self {
                Self {
                    session: session.clone(),
                    guid: guid.into(),
                }
            }

            /// Bind, set the popover cookie and verify when asked
            pub async fn open(
                session: &Session,
                guid: impl Into<String>,
                verify: bool,
            ) -> ProbeResult<Self> {
                Page::checked(Self::new(session, guid), verify).await
            }

            /// Registration GUID
            #[must_use]
            pub fn guid(&self) -> &str {
                &self.guid
            }

            elements! {
                title: Selector::css("[data-test-registration-title]");
            }
        }

        impl crate::page_object::Component for $name {
            fn session(&self) -> &Session {
                &self.session
            }
        }

        #[async_trait::async_trait]
        impl Page for $name {
            const IDENTITY: Selector = $identity;

            fn url(&self) -> Option<String> {
                Some(guid_url(&self.session.settings().osf_home, &self.guid, $addition))
            }

            async fn prepare(&self) -> ProbeResult<()> {
                let (name, value) = FEATURE_POPOVER_COOKIE;
                self.session.add_cookie(name, value).await
            }
        }
    };
}

/// Draft registration page at `{osf_home}/registries/drafts/{id}/{addition}`
macro_rules! draft_page {
    ($(#[$meta:meta])* $name:ident, $addition:literal, $identity:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            session: Session,
            draft_id: String,
        }

        impl $name {
            /// Bind to a session and draft id
            #[must_use]
            pub fn new(session: &Session, draft_id: impl Into<String>) -> Self {
                Self {
                    session: session.clone(),
                    draft_id: draft_id.into(),
                }
            }

            /// Bind, verifying the current page when asked
            pub async fn open(
                session: &Session,
                draft_id: impl Into<String>,
                verify: bool,
            ) -> ProbeResult<Self> {
                Page::checked(Self::new(session, draft_id), verify).await
            }

            /// Draft id
            #[must_use]
            pub fn draft_id(&self) -> &str {
                &self.draft_id
            }

            /// Registries navbar
            #[must_use]
            pub fn navbar(&self) -> RegistriesNavbar {
                RegistriesNavbar::new(&self.session)
            }

            elements! {
                loading_indicator: Selector::css(".ball-scale");
                page_heading: Selector::css("h2[data-test-page-heading]");
                next_page_button: Selector::css("a[data-test-goto-next-page] > button");
                first_file_name: Selector::css("span[data-test-file-name]");
                missing_data_ind: Selector::css("svg[data-icon=\"exclamation-circle\"]");
                sampling_plan_page_link: Selector::css("a[data-test-link=\"3-sampling-plan\"]");
                review_page_link: Selector::css("a[data-test-link=\"review\"]");
            }
        }

        impl crate::page_object::Component for $name {
            fn session(&self) -> &Session {
                &self.session
            }
        }

        impl Page for $name {
            const IDENTITY: Selector = $identity;

            fn url(&self) -> Option<String> {
                Some(draft_url(&self.session.settings().osf_home, &self.draft_id, $addition))
            }
        }
    };
}

// =============================================================================
// PROVIDER PAGES
// =============================================================================

provider_page! {
    /// Registries landing for a provider, or OSF Registries
    RegistriesLandingPage, navbar: RegistriesNavbar
}

impl RegistriesLandingPage {
    elements! {
        search_box: Selector::id("search");
    }
}

impl Page for RegistriesLandingPage {
    const IDENTITY: Selector =
        Selector::css("[data-test-registries-list-paragraph]").with_wait(Wait::Long);

    fn url(&self) -> Option<String> {
        Some(registries_url(&self.session.settings().osf_home, self.provider(), ""))
    }
}

provider_page! {
    /// Registration search
    RegistriesDiscoverPage, navbar: RegistriesNavbar
}

impl RegistriesDiscoverPage {
    elements! {
        search_box: Selector::id("search-input");
        loading_indicator: Selector::css(".ball-scale").with_wait(Wait::Long);
    }

    groups! {
        search_results: Selector::css("._title_1wvii8");
    }
}

impl Page for RegistriesDiscoverPage {
    const IDENTITY: Selector =
        Selector::css("div[data-analytics-scope=\"Registries Discover page\"]");

    fn url(&self) -> Option<String> {
        Some(registries_url(&self.session.settings().osf_home, self.provider(), "discover"))
    }
}

provider_page! {
    /// Start a new draft registration
    RegistrationAddNewPage, navbar: RegistriesNavbar
}

impl RegistrationAddNewPage {
    elements! {
        has_project_button: Selector::css("form > div > fieldset > div:nth-child(2)");
        no_project_button: Selector::css("form > div > fieldset > div:nth-child(3)");
        project_listbox_trigger: Selector::css(
            "label[data-test-project-select] > div.ember-basic-dropdown-trigger.ember-power-select-trigger",
        );
        schema_listbox_trigger: Selector::css(
            "label[data-test-schema-select] > div.ember-basic-dropdown-trigger.ember-power-select-trigger",
        );
        create_draft_button: Selector::css("button[data-test-start-registration-button]");
    }

    groups! {
        /// Options of whichever listbox is open, project or schema
        dropdown_options: POWER_SELECT_OPTIONS;
    }

    /// Click the open listbox option labelled `selection`
    pub async fn select_from_dropdown_listbox(&self, selection: &str) -> ProbeResult<bool> {
        select_from_dropdown_listbox(&self.dropdown_options(), selection).await
    }
}

impl Page for RegistrationAddNewPage {
    const IDENTITY: Selector =
        Selector::css("form[data-test-new-registration-form]").with_wait(Wait::Long);

    /// Unlike the other registries pages, keeps the `osf` segment
    fn url(&self) -> Option<String> {
        let provider_id = self.provider().map_or("osf", |p| p.id.as_str());
        Some(format!(
            "{}/registries/{provider_id}/new",
            self.session.settings().osf_home.trim_end_matches('/')
        ))
    }
}

provider_page! {
    /// Withdrawn registration
    RegistrationTombstonePage, navbar: RegistriesNavbar
}

impl RegistrationTombstonePage {
    elements! {
        tombstone_title: Selector::css("h2[data-test-tombstone-title]");
    }
}

impl Page for RegistrationTombstonePage {
    const IDENTITY: Selector =
        Selector::css("div[data-analytics-scope=\"Tombstone page\"]").with_wait(Wait::Long);
}

// =============================================================================
// SUBMITTED REGISTRATIONS
// =============================================================================

registration_page! {
    /// Registration overview
    RegistrationDetailPage, "", Selector::css("[data-test-page-heading]").with_wait(Wait::Long)
}

impl RegistrationDetailPage {
    elements! {
        narrative_summary: Selector::css("[data-test-read-only-response]");
        updates_dropdown: Selector::css("[data-test-update-button]");
        update_registration_button: Selector::css("[data-test-update-dropdown-create-new-revision]");
        update_registration_dialogue: Selector::css("[data-test-new-update-dialog-main]");
        update_registration_dialogue_next: Selector::css("[data-test-new-update-dialog-footer-next]");
        associated_project_link: Selector::css("a[data-analytics-name=\"Registered from\"]");
        open_practice_resource_data: Selector::css("[data-test-resource-link]");
        add_resource_button: Selector::css("button[aria-label=\"Add resource\"]");
        doi_input_field: Selector::xpath("//input[@name=\"pid\"]");
        resource_list: Selector::xpath("//li[text()=\"This registration has no resources.\"]");
        resource_type_dropdown: Selector::css("[data-test-power-select-dropdown]");
        data_icon: Selector::css("img[data-analytics-name=\"data\"]");
        preview_button: Selector::css("[data-test-preview-button]");
        resource_type_add_button: Selector::css("[data-test-add-button]");
        resource_type: Selector::css("[data-test-resource-card-type]");
        resource_type_link: Selector::css("[data-test-resource-card-pid-link]");
        resource_type_delete_button: Selector::css("button[aria-label=\"Delete resource\"]");
        resource_type_delete_confirm: Selector::css("[data-test-confirm-delete]");
        resource_type_edit_button: Selector::css("button[aria-label=\"Edit resource\"]");
        resource_description: Selector::xpath(
            "//textarea[@class=\"ember-text-area ember-view form-control\"]",
        );
        save_button: Selector::css("[data-test-save-button]");
        resource_card_description: Selector::css("[data-test-resource-card-description]");
    }

    groups! {
        dropdown_options: WORMHOLE_OPTIONS;
    }

    /// Click the resource-type option labelled `selection`
    pub async fn select_from_dropdown_listbox(&self, selection: &str) -> ProbeResult<bool> {
        select_from_dropdown_listbox(&self.dropdown_options(), selection).await
    }
}

registration_page! {
    /// Registration metadata
    RegistrationMetadataPage, "metadata", Selector::css("[data-test-display-resource-type-general]")
}

impl RegistrationMetadataPage {
    elements! {
        metadata_description: Selector::css("[data-test-display-node-description]");
        edit_metadata_description_button: Selector::css("[data-test-edit-node-description-button]");
        save_metadata_description_button: Selector::css("[data-test-save-node-description-button]");
        contributors_list: Selector::css("[data-test-contributors-list]");
        resource_type: Selector::css("[data-test-display-resource-type-general]");
        resource_language: Selector::css("[data-test-display-resource-language]");
        resource_type_dropdown: Selector::css("[data-test-select-resource-type]");
        resource_language_dropdown: Selector::css("[data-test-select-resource-language]");
        resource_information_save_button: Selector::css("[data-test-save-resource-metadata-button]");
        funder_name: Selector::xpath("//span[@class=\"ember-power-select-status-icon\"]");
        funder_name_search_input: Selector::xpath("//input[@class=\"ember-power-select-search-input\"]");
        award_title: Selector::xpath("//input[@name=\"award_title\"]");
        award_info_uri: Selector::xpath("//input[@name=\"award_uri\"]");
        award_number: Selector::xpath("//input[@name=\"award_number\"]");
        add_funder_button: Selector::xpath("//button[text()=\"Add funder\"]");
        save_funder_info_button: Selector::css("[data-test-save-funding-metadata-button]");
        display_funder_name: Selector::css("[data-test-display-funder-name]");
        display_award_title: Selector::css("[data-test-display-funder-award-title]");
        display_award_number: Selector::css("[data-test-display-funder-award-number]");
        display_award_info_uri: Selector::css("[data-test-display-funder-award-uri]");
    }

    groups! {
        dropdown_options: WORMHOLE_OPTIONS;
    }

    /// Click the open listbox option labelled `selection`
    pub async fn select_from_dropdown_listbox(&self, selection: &str) -> ProbeResult<bool> {
        select_from_dropdown_listbox(&self.dropdown_options(), selection).await
    }
}

registration_page! {
    /// Files attached to a registration
    RegistrationFilesListPage, "files", Selector::css("[data-test-file-providers-list]")
}

impl RegistrationFilesListPage {
    elements! {
        file_list_button: Selector::css("[data-test-file-list-link]");
        loading_indicator: Selector::css(".ball-scale");
        first_file_name: Selector::css("[data-test-file-name]");
        first_file_options_button: Selector::css("[data-test-file-download-share-trigger]");
        download_link: Selector::css("[data-test-download-button]");
        embed_link: Selector::css("[data-test-embed-button]");
        copy_js_link: Selector::css("[data-test-copy-js]");
        copy_html_link: Selector::css("[data-test-copy-html]");
    }
}

registration_page! {
    /// Registration resources
    RegistrationResourcesPage, "resources", Selector::css("[data-test-add-resource-section]")
}

registration_page! {
    /// Registration wiki
    RegistrationWikiPage, "wiki", Selector::id("wikiName")
}

registration_page! {
    /// Registration components
    RegistrationComponentsPage, "components", Selector::css("[data-test-components-page-heading]")
}

registration_page! {
    /// Registration links
    RegistrationLinksPage, "links", Selector::css("[data-test-links-page-heading]")
}

registration_page! {
    /// Registration analytics
    RegistrationAnalyticsPage, "analytics", Selector::css("[data-test-analytics-page-heading]")
}

registration_page! {
    /// Registration comments
    RegistrationCommentsPage, "comments", Selector::css("._CommentsList_kh9x27")
}

/// A file inside a registration, addressed by the file's own GUID
#[derive(Debug, Clone)]
pub struct RegistrationFileDetailPage {
    session: Session,
    guid: String,
}

impl RegistrationFileDetailPage {
    /// Bind to a session and file GUID
    #[must_use]
    pub fn new(session: &Session, guid: impl Into<String>) -> Self {
        Self {
            session: session.clone(),
            guid: guid.into(),
        }
    }

    elements! {
        file_name: Selector::css("h2[data-test-filename]");
        first_file_options_button: Selector::css("[data-test-file-download-share-trigger]");
        download_link: Selector::css("[data-test-download-button]");
        embed_link: Selector::css("[data-test-embed-button]");
        copy_js_link: Selector::css("[data-test-copy-js]");
        copy_html_link: Selector::css("[data-test-copy-html]");
        versions_button: Selector::css("[data-test-versions-button]");
        first_revision_toggle_button: Selector::css("[data-test-file-version-toggle-button]");
        copy_md5_link: Selector::css("div[data-test-file-version-section=\"md5\"] > button");
        copy_sha2_link: Selector::css("div[data-test-file-version-section=\"sha2\"] > button");
        tags_button: Selector::css("[data-test-tags-button]");
        tags_input_box: Selector::css("li.emberTagInput-new > input");
    }

    groups! {
        tags: Selector::css("ul[data-test-tags-widget-tag-input] > li > span");
    }

    /// Tag whose text is exactly `value`
    pub async fn tag(&self, value: &str) -> ProbeResult<Option<ResolvedElement<'_>>> {
        find_by_text(&self.tags(), value).await
    }
}

impl crate::page_object::Component for RegistrationFileDetailPage {
    fn session(&self) -> &Session {
        &self.session
    }
}

impl Page for RegistrationFileDetailPage {
    const IDENTITY: Selector = Selector::css("[data-test-file-renderer]");

    fn url(&self) -> Option<String> {
        Some(guid_url(&self.session.settings().osf_home, &self.guid, ""))
    }
}

// =============================================================================
// DRAFTS
// =============================================================================

draft_page! {
    /// Draft metadata: title, description, category, license, subjects, tags
    DraftRegistrationMetadataPage, "metadata",
    Selector::css("div[data-test-metadata-title]").with_wait(Wait::Long)
}

impl DraftRegistrationMetadataPage {
    elements! {
        title_input: Selector::name("title");
        description_textarea: Selector::css("div[data-test-metadata-description] > div > textarea");
        category_listbox_trigger: Selector::css(
            "#category > div.ember-basic-dropdown-trigger.ember-power-select-trigger",
        );
        license_listbox_trigger: Selector::css(
            "div[data-test-select-license] > div.ember-basic-dropdown-trigger.ember-power-select-trigger",
        );
        first_selected_subject: Selector::css("li[data-test-selected-subject]");
        expand_first_subject_button: Selector::css("label[data-test-subject-browse-label] > button");
        tags_input_box: Selector::css("li.emberTagInput-new > input");
    }

    groups! {
        /// Options of whichever listbox is open, category or license
        dropdown_options: POWER_SELECT_OPTIONS;
        top_level_subjects: Selector::css("div[data-analytics-scope=\"Browse\"] > ul > li");
        /// Populated only once the first top-level subject is expanded
        first_subject_second_level_subjects: Selector::css(
            "div[data-analytics-scope=\"Browse\"] > ul > li > div > ul > li",
        );
    }

    /// Click the open listbox option labelled `selection`
    pub async fn select_from_dropdown_listbox(&self, selection: &str) -> ProbeResult<bool> {
        select_from_dropdown_listbox(&self.dropdown_options(), selection).await
    }

    /// Tick the checkbox of the top-level subject labelled `selection`
    pub async fn select_top_level_subject(&self, selection: &str) -> ProbeResult<bool> {
        let Some(subject) = find_by_text(&self.top_level_subjects(), selection).await? else {
            return Ok(false);
        };
        subject
            .find(Selector::css("input.ember-checkbox.ember-view"))
            .click()
            .await?;
        Ok(true)
    }
}

draft_page! {
    /// Open-ended template summary question
    DraftRegistrationSummaryPage, "1-summary",
    Selector::name("__responseKey_summary").with_wait(Wait::Long)
}

impl DraftRegistrationSummaryPage {
    elements! {
        summary_textbox: Selector::name("__responseKey_summary");
        review_page_button: Selector::css("a[data-test-goto-review] > button");
    }
}

draft_page! {
    /// Final review before registering
    DraftRegistrationReviewPage, "review",
    Selector::css("[data-test-toggle-anchor-nav-button]").with_wait(Wait::Long)
}

impl DraftRegistrationReviewPage {
    elements! {
        title: Selector::css("p[data-test-review-response=\"title\"]");
        description: Selector::css("p[data-test-review-response=\"description\"]");
        category: Selector::css("p[data-test-review-response=\"category\"]");
        license: Selector::css("p[data-test-review-response=\"license\"]");
        subject: Selector::css("li[data-test-selected-subject]");
        tags: Selector::css("ul[data-test-tags-widget-tag-input]");
        register_button: Selector::css("button[data-test-goto-register]");
        invalid_responses_text: Selector::css("div[data-test-invalid-responses-text]");
        immediate_radio_button: Selector::css("input[value=\"immediate\"]");
        submit_button: Selector::css("button[data-test-submit-registration-button]");
    }
}
