//! CAS pages: sign-in, two-factor, terms of service, institutions and the
//! generic status/exception page.
//!
//! Every CAS page lives on the CAS host, so the location rule is a host
//! comparison rather than a path prefix; CAS appends `service` and flow
//! parameters freely.

use crate::locator::{Selector, Wait};
use crate::page_object::{component, elements, groups, page, same_host, Component, Page};

/// COS home linked from the CAS footer
pub const COS_URL: &str = "https://www.cos.io/";
/// Terms of use linked from CAS pages
pub const TERMS_OF_USE_URL: &str =
    "https://github.com/CenterForOpenScience/cos.io/blob/master/TERMS_OF_USE.md";
/// Privacy policy linked from CAS pages
pub const PRIVACY_POLICY_URL: &str =
    "https://github.com/CenterForOpenScience/cos.io/blob/master/PRIVACY_POLICY.md";
/// Status page linked from the CAS footer
pub const STATUS_URL: &str = "https://status.cos.io/";

fn on_cas(page: &impl Component, current: &str) -> bool {
    same_host(&page.session().settings().cas_domain, current)
}

component! {
    /// Footer shared by the CAS sign-in pages
    CasFooter
}

impl CasFooter {
    elements! {
        cos_footer_link: Selector::css("a[href=\"https://www.cos.io/\"]");
        terms_of_use_footer_link: Selector::css("#footer a[href$=\"TERMS_OF_USE.md\"]");
        privacy_policy_footer_link: Selector::css("#footer a[href$=\"PRIVACY_POLICY.md\"]");
        status_footer_link: Selector::css("a[href=\"https://status.cos.io/\"]");
    }
}

// =============================================================================
// SIGN IN
// =============================================================================

page! {
    /// CAS username/password form
    LoginPage
}

impl LoginPage {
    elements! {
        username_input: Selector::id("username");
        password_input: Selector::id("password");
        submit_button: Selector::name("submit");
        remember_me_checkbox: Selector::id("rememberMe");
        institutional_login_button: Selector::id("instnLogin");
        orcid_login_button: Selector::id("orcidlogin");
        osf_home_link: Selector::css("a.navbar-brand");
        sign_up_button: Selector::link_text("Sign up");
        reset_password_link: Selector::link_text("Reset password");
        need_help_link: Selector::link_text("Need help?");
        /// Inline validation message under the form
        login_error_message: Selector::id("loginErrorMessage");
    }

    /// Page footer
    #[must_use]
    pub fn footer(&self) -> CasFooter {
        CasFooter::new(&self.session)
    }
}

impl Page for LoginPage {
    const IDENTITY: Selector = Selector::id("fm1");

    fn url(&self) -> Option<String> {
        Some(format!("{}/login", self.session.settings().cas_domain))
    }

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}

page! {
    /// One-time password prompt shown to two-factor users after sign-in
    Login2FAPage
}

impl Login2FAPage {
    elements! {
        /// Read-only display of the account being signed in
        username_input: Selector::id("username");
        one_time_password_input: Selector::id("oneTimePassword");
        verify_button: Selector::name("submit");
        login_error_message: Selector::id("loginErrorMessage");
        cancel_link: Selector::link_text("Cancel");
        need_help_link: Selector::link_text("Need help?");
    }
}

impl Page for Login2FAPage {
    const IDENTITY: Selector = Selector::id("oneTimePassword");

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}

page! {
    /// Terms of service acceptance shown to users who have not accepted yet
    LoginToSPage
}

impl LoginToSPage {
    elements! {
        tos_checkbox: Selector::id("termsOfServiceChecked");
        continue_button: Selector::id("primarySubmitButton");
        terms_of_use_link: Selector::link_text("Terms of Use");
        privacy_policy_link: Selector::link_text("Privacy Policy");
        cancel_link: Selector::link_text("Cancel");
    }
}

impl Page for LoginToSPage {
    const IDENTITY: Selector = Selector::id("termsOfServiceChecked");

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}

// =============================================================================
// STATUS PAGES
// =============================================================================

page! {
    /// Generic CAS card: logged in/out notices and custom exception pages
    GenericCASPage
}

impl GenericCASPage {
    elements! {
        /// `OSF HOME` inside a flow, `OSF CAS` on flow-less pages
        navbar_brand: Selector::css("a.navbar-brand");
        status_message: Selector::css("div.card-message > h2");
        auto_redirect_message: Selector::css("div.card-message > p");
        error_detail: Selector::css("div.card-message > pre");
    }
}

impl Page for GenericCASPage {
    const IDENTITY: Selector = Selector::css("div.card-message");

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}

page! {
    /// OAuth approve/deny prompt
    CASAuthorizationPage
}

impl CASAuthorizationPage {
    elements! {
        navbar_brand: Selector::css("a.navbar-brand");
        status_message: Selector::css("div.card-message > h2");
        allow_button: Selector::name("allow");
        deny_button: Selector::name("deny");
    }
}

impl Page for CASAuthorizationPage {
    const IDENTITY: Selector = Selector::css("form#fm1 button[name=\"allow\"]");

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}

// =============================================================================
// INSTITUTIONS
// =============================================================================

page! {
    /// Institution picker
    InstitutionalLoginPage
}

impl InstitutionalLoginPage {
    elements! {
        /// The `<select>`; index 0 is the placeholder
        institution_dropdown: Selector::id("institutionSelect");
        /// Disabled until an institution is chosen
        sign_in_button: Selector::id("institutionSubmit");
        osf_home_link: Selector::css("a.navbar-brand");
        sign_up_button: Selector::link_text("Sign up");
        cant_find_institution_link: Selector::link_text("I can't find my institution");
        need_help_link: Selector::link_text("Need help?");
        sign_in_with_osf_link: Selector::link_text("Sign in with OSF");
    }

    groups! {
        dropdown_options: Selector::css("#institutionSelect > option").with_wait(Wait::Long);
    }

    /// Page footer
    #[must_use]
    pub fn footer(&self) -> CasFooter {
        CasFooter::new(&self.session)
    }
}

impl Page for InstitutionalLoginPage {
    const IDENTITY: Selector = Selector::id("institutionSelect");

    fn url(&self) -> Option<String> {
        Some(format!(
            "{}/login?campaign=institution",
            self.session.settings().cas_domain
        ))
    }

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}

page! {
    /// Guidance for users whose institution is not supported
    UnsupportedInstitutionLoginPage
}

impl UnsupportedInstitutionLoginPage {
    elements! {
        sign_in_with_osf_link: Selector::link_text("Sign in with OSF");
        need_help_link: Selector::link_text("Need help?");
    }
}

impl Page for UnsupportedInstitutionLoginPage {
    const IDENTITY: Selector = Selector::css("div[data-test-unsupported-institution]");

    fn location_matches(&self, current: &str) -> bool {
        on_cas(self, current)
    }
}
