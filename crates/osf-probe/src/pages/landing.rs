//! OSF pages the sign-in flows hand over to.

use crate::locator::{Selector, Wait};
use crate::page_object::{elements, page, same_host, Page};

page! {
    /// OSF home page
    LandingPage
}

impl LandingPage {
    elements! {
        sign_up_button: Selector::css("a[data-test-sign-up-button]");
        search_input: Selector::css("input[data-test-search-input]");
    }
}

impl Page for LandingPage {
    const IDENTITY: Selector = Selector::css("[data-test-hero-heading]").with_wait(Wait::Long);

    fn url(&self) -> Option<String> {
        Some(format!("{}/", self.session.settings().osf_home))
    }

    /// Anywhere on the OSF host; CAS redirects back with varying paths
    fn location_matches(&self, current: &str) -> bool {
        same_host(&self.session.settings().osf_home, current)
    }
}

page! {
    /// Account registration form
    RegisterPage
}

impl RegisterPage {
    elements! {
        full_name_input: Selector::id("register-fullname");
        email_one_input: Selector::id("register-email1");
        email_two_input: Selector::id("register-email2");
        password_input: Selector::id("register-password");
        terms_of_service_checkbox: Selector::id("acceptedTermsOfService");
        sign_up_button: Selector::css("button[type=\"submit\"]");
    }
}

impl Page for RegisterPage {
    const IDENTITY: Selector = Selector::css("form#signUpForm");

    fn url(&self) -> Option<String> {
        Some(format!("{}/register", self.session.settings().osf_home))
    }
}

page! {
    /// Password reset request form
    ForgotPasswordPage
}

impl ForgotPasswordPage {
    elements! {
        email_input: Selector::id("forgotPasswordEmail");
        reset_password_button: Selector::css("#forgotPasswordForm button[type=\"submit\"]");
    }
}

impl Page for ForgotPasswordPage {
    const IDENTITY: Selector = Selector::id("forgotPasswordForm");

    fn url(&self) -> Option<String> {
        Some(format!("{}/forgotpassword/", self.session.settings().osf_home))
    }
}
