//! Meetings landing and meeting detail pages.

use crate::locator::{Selector, Wait};
use crate::page_object::{elements, page, Page};
use crate::pages::navbars::MeetingsNavbar;

page! {
    /// Meetings landing with the meetings list
    MeetingsPage
}

impl MeetingsPage {
    elements! {
        register_button: Selector::css("button[data-test-register-button]").with_wait(Wait::Long);
        register_text: Selector::css("div[data-test-register-panel-text]");
        upload_button: Selector::css("button[data-test-upload-button]").with_wait(Wait::Long);
        upload_text: Selector::css("div[data-test-upload-panel-text]");
        top_meeting_link: Selector::css("div[data-test-meetings-list-item-name] > a");
        filter_input: Selector::css("div[data-test-meetings-list-search] > div > input");
        sort_caret_name_asc: Selector::css("button[data-test-ascending-sort=\"name\"]");
        sort_caret_name_desc: Selector::css("button[data-test-descending-sort=\"name\"]");
        aps_logo: Selector::css("img[data-test-aps-img]");
        bitss_logo: Selector::css("img[data-test-bitss-img]");
        nrao_logo: Selector::css("img[data-test-nrao-img]");
        spsp_logo: Selector::css("img[data-test-spsp-img]");
        /// Placeholder line rendered while the list loads
        skeleton_row: Selector::css("div[data-test-ember-content-placeholders-text-line]");
    }

    /// Site navbar
    #[must_use]
    pub fn navbar(&self) -> MeetingsNavbar {
        MeetingsNavbar::new(&self.session)
    }
}

impl Page for MeetingsPage {
    const IDENTITY: Selector =
        Selector::css("img[alt=\"Logo for OSF meeting\"]").with_wait(Wait::VeryLong);

    fn url(&self) -> Option<String> {
        Some(format!("{}/meetings/", self.session.settings().osf_home))
    }
}

page! {
    /// A single meeting and its submissions
    MeetingDetailPage
}

impl MeetingDetailPage {
    elements! {
        meeting_title: Selector::css("h1[data-test-meeting-name]");
        entry_download_button: Selector::css("div[data-test-submissions-list-item-download] > button");
        first_entry_link: Selector::css("div[data-test-submissions-list-item-title] > a");
        title: Selector::css("#nodeTitleEditable").with_wait(Wait::Long);
        filter_input: Selector::css("input[placeholder=\"Search\"]");
        sort_caret_title_asc: Selector::css("button[data-test-ascending-sort=\"title\"]");
    }

    /// Site navbar
    #[must_use]
    pub fn navbar(&self) -> MeetingsNavbar {
        MeetingsNavbar::new(&self.session)
    }
}

impl Page for MeetingDetailPage {
    const IDENTITY: Selector =
        Selector::css("div._toggle-button-and-homepage-link-container_1h8tly");

    fn url(&self) -> Option<String> {
        Some(format!("{}/view/", self.session.settings().osf_home))
    }
}
