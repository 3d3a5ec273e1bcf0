//! CAS sign-in scenarios.
//!
//! Flows that need a fixture account (two-factor, terms of service,
//! unconfirmed, deactivated) are `dont_run_on_prod`: production has no such
//! accounts.

use crate::assertion::{assert_text_eq, ensure, Assertion};
use crate::locator::Element;
use crate::page_object::Page;
use crate::pages::login::{COS_URL, PRIVACY_POLICY_URL, STATUS_URL, TERMS_OF_USE_URL};
use crate::pages::{
    CASAuthorizationPage, ForgotPasswordPage, GenericCASPage, InstitutionalLoginPage, LandingPage, Login2FAPage,
    LoginPage, LoginToSPage, RegisterPage, UnsupportedInstitutionLoginPage,
};
use crate::result::{ProbeError, ProbeResult};
use crate::scenarios::{register, Scenario};
use crate::session::Session;
use crate::workflows::{expect_url, expect_url_contains, login_as};

const SIGN_IN_HELP: &str = "Sign-in-to-OSF";
const TWO_FACTOR_HELP: &str = "Enable-or-Disable-Two-Factor-Authentication";
const AUTO_REDIRECT: &str = "Auto-redirection didn't happen ...";
const OAUTH_REDIRECT: &str = "https://www.google.com/";

/// The login suite
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    register! {
        "login::page::institutional_login" [Smoke, CoreFunctionality] => institutional_login,
        "login::page::orcid_login" [Smoke, CoreFunctionality] => orcid_login,
        "login::page::osf_home_link" [Smoke] => osf_home_link,
        "login::page::sign_up_button" [Smoke] => sign_up_button,
        "login::page::reset_password_link" [Smoke] => reset_password_link,
        "login::page::need_help_link" [Smoke] => need_help_link,
        "login::page::cos_footer_link" [Smoke] => cos_footer_link,
        "login::page::terms_of_use_footer_link" [Smoke] => terms_of_use_footer_link,
        "login::page::privacy_policy_footer_link" [Smoke] => privacy_policy_footer_link,
        "login::page::status_footer_link" [Smoke] => status_footer_link,

        "login::two_factor::one_time_password_required" [DontRunOnProd] => one_time_password_required,
        "login::two_factor::invalid_one_time_password" [DontRunOnProd] => invalid_one_time_password,
        "login::two_factor::cancel" [DontRunOnProd] => cancel_two_factor,
        "login::two_factor::need_help_link" [DontRunOnProd] => two_factor_need_help,

        "login::terms_of_service::continue_button_disabled" [DontRunOnProd] => continue_button_disabled,
        "login::terms_of_service::terms_of_use_link" [DontRunOnProd] => tos_terms_of_use_link,
        "login::terms_of_service::privacy_policy_link" [DontRunOnProd] => tos_privacy_policy_link,
        "login::terms_of_service::cancel" [DontRunOnProd] => cancel_tos,

        "login::generic::logged_in_page" [] => generic_logged_in_page,
        "login::generic::logged_out_page" [] => generic_logged_out_page,

        "login::errors::missing_email" [] => missing_email,
        "login::errors::missing_password" [] => missing_password,
        "login::errors::invalid_email_and_password" [] => invalid_email_and_password,
        "login::errors::invalid_password" [] => invalid_password,

        "login::exceptions::service_not_authorized" [] => service_not_authorized,
        "login::exceptions::verification_key_login_failed" [] => verification_key_login_failed,
        "login::exceptions::flow_less_page_not_found" [] => flow_less_page_not_found,
        "login::exceptions::account_not_confirmed" [DontRunOnProd] => account_not_confirmed,
        "login::exceptions::account_disabled" [DontRunOnProd] => account_disabled,
        "login::exceptions::authorization_failed_missing_client_id" [DontRunOnProd] => authorization_failed_missing_client_id,

        "login::oauth::allow_authorization" [DontRunOnProd] => allow_authorization,
        "login::oauth::deny_authorization" [DontRunOnProd] => deny_authorization,
        "login::oauth::invalid_redirect_uri" [DontRunOnProd] => authorization_failed_invalid_redirect_uri,
        "login::oauth::invalid_scope" [DontRunOnProd] => authorization_failed_invalid_scope,

        "login::institution::enable_sign_in_button" [Smoke] => enable_sign_in_button,
        "login::institution::osf_home_link" [Smoke] => institution_osf_home_link,
        "login::institution::sign_up_button" [Smoke] => institution_sign_up_button,
        "login::institution::cant_find_institution_link" [Smoke] => cant_find_institution_link,
        "login::institution::need_help_link" [Smoke] => institution_need_help_link,
        "login::institution::sign_in_with_osf_link" [Smoke] => sign_in_with_osf_link,
        "login::institution::cos_footer_link" [Smoke] => institution_cos_footer_link,
        "login::institution::terms_of_use_footer_link" [Smoke] => institution_terms_of_use_footer_link,
        "login::institution::privacy_policy_footer_link" [Smoke] => institution_privacy_policy_footer_link,
        "login::institution::status_footer_link" [Smoke] => institution_status_footer_link,
    }
}

async fn login_page(session: &Session) -> ProbeResult<LoginPage> {
    let page = LoginPage::new(session);
    page.goto().await?;
    Ok(page)
}

async fn institution_page(session: &Session) -> ProbeResult<InstitutionalLoginPage> {
    let page = InstitutionalLoginPage::new(session);
    page.goto().await?;
    Ok(page)
}

async fn follow(session: &Session, link: Element<'_>, expected: &str) -> ProbeResult<()> {
    link.click().await?;
    expect_url(session, expected).await
}

/// `disabled` DOM property reads back as `true`
async fn disabled(element: &Element<'_>) -> ProbeResult<bool> {
    Ok(element.property("disabled").await?.as_deref() == Some("true"))
}

// =============================================================================
// LOGIN PAGE
// =============================================================================

async fn institutional_login(session: &Session) -> ProbeResult<()> {
    login_page(session).await?.institutional_login_button().click().await?;
    let page = InstitutionalLoginPage::open(session, true).await?;
    let options = page.dropdown_options().len().await?;
    ensure(options > 1, "institution dropdown is populated")
}

async fn orcid_login(session: &Session) -> ProbeResult<()> {
    login_page(session).await?.orcid_login_button().click().await?;
    // Signed-out ORCID OAuth redirects once before its sign-in page
    expect_url_contains(session, "https://orcid.org/signin").await?;
    let url = session.current_url().await?;
    ensure(!url.contains("error"), "ORCID OAuth callback carries no error")
}

async fn osf_home_link(session: &Session) -> ProbeResult<()> {
    login_page(session).await?.osf_home_link().click().await?;
    LandingPage::open(session, true).await.map(drop)
}

async fn sign_up_button(session: &Session) -> ProbeResult<()> {
    login_page(session).await?.sign_up_button().click().await?;
    RegisterPage::open(session, true).await.map(drop)
}

async fn reset_password_link(session: &Session) -> ProbeResult<()> {
    login_page(session).await?.reset_password_link().click().await?;
    ForgotPasswordPage::open(session, true).await.map(drop)
}

async fn need_help_link(session: &Session) -> ProbeResult<()> {
    login_page(session).await?.need_help_link().click().await?;
    expect_url_contains(session, SIGN_IN_HELP).await
}

async fn cos_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = login_page(session).await?.footer();
    follow(session, footer.cos_footer_link(), COS_URL).await
}

async fn terms_of_use_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = login_page(session).await?.footer();
    follow(session, footer.terms_of_use_footer_link(), TERMS_OF_USE_URL).await
}

async fn privacy_policy_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = login_page(session).await?.footer();
    follow(session, footer.privacy_policy_footer_link(), PRIVACY_POLICY_URL).await
}

async fn status_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = login_page(session).await?.footer();
    follow(session, footer.status_footer_link(), STATUS_URL).await
}

// =============================================================================
// TWO-FACTOR
// =============================================================================

async fn two_factor_page(session: &Session) -> ProbeResult<Login2FAPage> {
    login_as(session, &session.settings().credentials.two_factor_user).await?;
    Login2FAPage::open(session, true).await
}

async fn one_time_password_required(session: &Session) -> ProbeResult<()> {
    let page = two_factor_page(session).await?;
    ensure(page.username_input().present().await?, "username is shown")?;
    ensure(
        page.one_time_password_input().present().await?,
        "one-time password input is shown",
    )?;
    page.verify_button().click().await?;
    assert_text_eq(&page.login_error_message(), "One-time password is required.").await
}

async fn invalid_one_time_password(session: &Session) -> ProbeResult<()> {
    let page = two_factor_page(session).await?;
    page.one_time_password_input()
        .send_keys_deliberately("999999")
        .await?;
    page.verify_button().click().await?;
    assert_text_eq(
        &page.login_error_message(),
        "The one-time password you entered is incorrect.",
    )
    .await
}

async fn cancel_two_factor(session: &Session) -> ProbeResult<()> {
    two_factor_page(session).await?.cancel_link().click().await?;
    LandingPage::open(session, true).await.map(drop)
}

async fn two_factor_need_help(session: &Session) -> ProbeResult<()> {
    two_factor_page(session).await?.need_help_link().click().await?;
    expect_url_contains(session, TWO_FACTOR_HELP).await
}

// =============================================================================
// TERMS OF SERVICE
// =============================================================================

async fn tos_page(session: &Session) -> ProbeResult<LoginToSPage> {
    login_as(session, &session.settings().credentials.tos_user).await?;
    LoginToSPage::open(session, true).await
}

async fn continue_button_disabled(session: &Session) -> ProbeResult<()> {
    let page = tos_page(session).await?;
    ensure(
        disabled(&page.continue_button()).await?,
        "continue is disabled before accepting",
    )?;
    page.tos_checkbox().click().await?;
    ensure(
        page.continue_button().is_enabled().await?,
        "continue is enabled after accepting",
    )
}

async fn tos_terms_of_use_link(session: &Session) -> ProbeResult<()> {
    let page = tos_page(session).await?;
    follow(session, page.terms_of_use_link(), TERMS_OF_USE_URL).await
}

async fn tos_privacy_policy_link(session: &Session) -> ProbeResult<()> {
    let page = tos_page(session).await?;
    follow(session, page.privacy_policy_link(), PRIVACY_POLICY_URL).await
}

async fn cancel_tos(session: &Session) -> ProbeResult<()> {
    tos_page(session).await?.cancel_link().click().await?;
    LandingPage::open(session, true).await.map(drop)
}

// =============================================================================
// GENERIC PAGES
// =============================================================================

async fn generic_page(session: &Session, path: &str) -> ProbeResult<GenericCASPage> {
    let url = format!("{}{path}", session.settings().cas_domain);
    session.navigate(&url).await?;
    GenericCASPage::open(session, true).await
}

async fn generic_logged_in_page(session: &Session) -> ProbeResult<()> {
    login_as(session, &session.settings().credentials.user_one).await?;
    let page = generic_page(session, "/login").await?;
    assert_text_eq(&page.auto_redirect_message(), AUTO_REDIRECT).await?;
    assert_text_eq(&page.status_message(), "Login successful").await
}

async fn generic_logged_out_page(session: &Session) -> ProbeResult<()> {
    let page = generic_page(session, "/logout").await?;
    assert_text_eq(&page.auto_redirect_message(), AUTO_REDIRECT).await?;
    assert_text_eq(&page.status_message(), "Logout successful").await
}

// =============================================================================
// LOGIN ERRORS
// =============================================================================

async fn missing_email(session: &Session) -> ProbeResult<()> {
    let page = login_page(session).await?;
    page.submit_button().click().await?;
    assert_text_eq(&page.login_error_message(), "Email is required.").await
}

async fn missing_password(session: &Session) -> ProbeResult<()> {
    let page = login_page(session).await?;
    page.username_input().send_keys_deliberately("foo").await?;
    page.submit_button().click().await?;
    assert_text_eq(&page.login_error_message(), "Password is required.").await
}

async fn rejected(session: &Session, user: &str) -> ProbeResult<()> {
    let page = login_page(session).await?;
    page.username_input().send_keys_deliberately(user).await?;
    page.password_input().send_keys_deliberately("foo").await?;
    page.submit_button().click().await?;
    assert_text_eq(
        &page.login_error_message(),
        "The email or password you entered is incorrect.",
    )
    .await
}

async fn invalid_email_and_password(session: &Session) -> ProbeResult<()> {
    rejected(session, "foo").await
}

async fn invalid_password(session: &Session) -> ProbeResult<()> {
    let user = session.settings().credentials.user_one.email.clone();
    rejected(session, &user).await
}

// =============================================================================
// EXCEPTION PAGES
// =============================================================================

async fn exception(session: &Session, brand: &str, status: &str) -> ProbeResult<GenericCASPage> {
    let page = GenericCASPage::open(session, true).await?;
    assert_text_eq(&page.navbar_brand(), brand).await?;
    assert_text_eq(&page.status_message(), status).await?;
    Ok(page)
}

async fn service_not_authorized(session: &Session) -> ProbeResult<()> {
    let cas = &session.settings().cas_domain;
    session
        .navigate(&format!("{cas}/login?service=https://noservice.osf.io/"))
        .await?;
    exception(session, "OSF HOME", "Service not authorized").await.map(drop)
}

async fn verification_key_login_failed(session: &Session) -> ProbeResult<()> {
    let settings = session.settings();
    let cas = &settings.cas_domain;
    let user = &settings.credentials.user_one.email;
    let url = format!(
        "{cas}/login?service={cas}/login/?next={cas}/&username={user}&verification_key=foo"
    );
    session.navigate(&url).await?;
    exception(session, "OSF HOME", "Verification key login failed").await.map(drop)
}

/// CAS serves only `/login`, `/logout` and `/oauth`; anything else is a
/// flow-less page branded `OSF CAS`
async fn flow_less_page_not_found(session: &Session) -> ProbeResult<()> {
    let url = format!("{}/nopath", session.settings().cas_domain);
    session.navigate(&url).await?;
    exception(session, "OSF CAS", "Page Not Found").await.map(drop)
}

async fn account_not_confirmed(session: &Session) -> ProbeResult<()> {
    login_as(session, &session.settings().credentials.unconfirmed_user).await?;
    exception(session, "OSF HOME", "Account not confirmed").await.map(drop)
}

async fn account_disabled(session: &Session) -> ProbeResult<()> {
    login_as(session, &session.settings().credentials.deactivated_user).await?;
    exception(session, "OSF HOME", "Account disabled").await.map(drop)
}

async fn authorization_failed_missing_client_id(session: &Session) -> ProbeResult<()> {
    login_as(session, &session.settings().credentials.user_one).await?;
    authorize(session, "", OAUTH_REDIRECT, "osf.full_read osf.full_write", "online").await?;
    let page = exception(session, "OSF HOME", "Authorization failed").await?;
    assert_text_eq(&page.error_detail(), "missing_request_param: client_id").await
}

// =============================================================================
// OAUTH
// =============================================================================

fn devapp_client_id(session: &Session) -> ProbeResult<String> {
    let client_id = &session.settings().credentials.devapp_client_id;
    if client_id.is_empty() {
        return Err(ProbeError::config("DEVAPP_CLIENT_ID is not configured"));
    }
    Ok(client_id.clone())
}

/// Open the CAS authorization endpoint for a code grant
async fn authorize(
    session: &Session,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    access_type: &str,
) -> ProbeResult<()> {
    let url = format!(
        "{}/oauth2/authorize?response_type=code&client_id={client_id}&redirect_uri={redirect_uri}\
         &scope={scope}&access_type={access_type}&approval_prompt=force",
        session.settings().cas_domain
    );
    session.navigate(&url).await
}

/// Sign in, ask for `scope` and land on the approve/deny prompt
async fn authorization_prompt(session: &Session, scope: &str) -> ProbeResult<CASAuthorizationPage> {
    let client_id = devapp_client_id(session)?;
    login_as(session, &session.settings().credentials.user_one).await?;
    authorize(session, &client_id, OAUTH_REDIRECT, scope, "offline").await?;
    let page = CASAuthorizationPage::open(session, true).await?;
    assert_text_eq(&page.navbar_brand(), "OSF HOME").await?;
    assert_text_eq(&page.status_message(), "Approve or deny authorization").await?;
    Ok(page)
}

/// Wait for the redirect back to the app and return its query value for `key`
async fn callback_param(session: &Session, key: &str) -> ProbeResult<String> {
    expect_url_contains(session, OAUTH_REDIRECT).await?;
    let url = session.current_url().await?;
    Ok(url
        .split_once('?')
        .and_then(|(_, query)| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap_or_default())
}

async fn allow_authorization(session: &Session) -> ProbeResult<()> {
    let page = authorization_prompt(
        session,
        "osf.nodes.metadata_read osf.nodes.access_read osf.nodes.data_read",
    )
    .await?;
    page.allow_button().click().await?;
    let code = callback_param(session, "code").await?;
    ensure(!code.is_empty(), "callback carries an authorization code")
}

async fn deny_authorization(session: &Session) -> ProbeResult<()> {
    let page = authorization_prompt(session, "osf.full_read osf.users.email_read").await?;
    page.deny_button().click().await?;
    let error = callback_param(session, "error").await?;
    Assertion::equals("access_denied", error.as_str()).into_result()
}

async fn authorization_failed_invalid_redirect_uri(session: &Session) -> ProbeResult<()> {
    let client_id = devapp_client_id(session)?;
    login_as(session, &session.settings().credentials.user_one).await?;
    let typo = "https://www.gogle.com/";
    authorize(
        session,
        &client_id,
        typo,
        "osf.nodes.access_write osf.users.profile_read",
        "online",
    )
    .await?;
    let page = exception(session, "OSF HOME", "Authorization failed").await?;
    assert_text_eq(&page.error_detail(), &format!("invalid_redirect_url: {typo}")).await
}

async fn authorization_failed_invalid_scope(session: &Session) -> ProbeResult<()> {
    let client_id = devapp_client_id(session)?;
    login_as(session, &session.settings().credentials.user_one).await?;
    authorize(session, &client_id, OAUTH_REDIRECT, "everything", "online").await?;
    let page = exception(session, "OSF HOME", "Authorization failed").await?;
    assert_text_eq(&page.error_detail(), "invalid_scope: everything").await
}

// =============================================================================
// INSTITUTION LOGIN
// =============================================================================

async fn enable_sign_in_button(session: &Session) -> ProbeResult<()> {
    let page = institution_page(session).await?;
    ensure(
        disabled(&page.sign_in_button()).await?,
        "sign in is disabled before choosing an institution",
    )?;
    // index 0 is the "-- select an institution --" placeholder
    page.institution_dropdown().select_index(1).await?;
    ensure(
        page.sign_in_button().is_enabled().await?,
        "sign in is enabled after choosing an institution",
    )
}

async fn institution_osf_home_link(session: &Session) -> ProbeResult<()> {
    institution_page(session).await?.osf_home_link().click().await?;
    LandingPage::open(session, true).await.map(drop)
}

async fn institution_sign_up_button(session: &Session) -> ProbeResult<()> {
    institution_page(session).await?.sign_up_button().click().await?;
    RegisterPage::open(session, true).await.map(drop)
}

async fn cant_find_institution_link(session: &Session) -> ProbeResult<()> {
    institution_page(session)
        .await?
        .cant_find_institution_link()
        .click()
        .await?;
    UnsupportedInstitutionLoginPage::open(session, true).await.map(drop)
}

async fn institution_need_help_link(session: &Session) -> ProbeResult<()> {
    institution_page(session).await?.need_help_link().click().await?;
    expect_url_contains(session, SIGN_IN_HELP).await
}

async fn sign_in_with_osf_link(session: &Session) -> ProbeResult<()> {
    institution_page(session)
        .await?
        .sign_in_with_osf_link()
        .click()
        .await?;
    LoginPage::open(session, true).await.map(drop)
}

async fn institution_cos_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = institution_page(session).await?.footer();
    follow(session, footer.cos_footer_link(), COS_URL).await
}

async fn institution_terms_of_use_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = institution_page(session).await?.footer();
    follow(session, footer.terms_of_use_footer_link(), TERMS_OF_USE_URL).await
}

async fn institution_privacy_policy_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = institution_page(session).await?.footer();
    follow(session, footer.privacy_policy_footer_link(), PRIVACY_POLICY_URL).await
}

async fn institution_status_footer_link(session: &Session) -> ProbeResult<()> {
    let footer = institution_page(session).await?.footer();
    follow(session, footer.status_footer_link(), STATUS_URL).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::locator::Selector;
    use crate::mock::{MockDriver, MockElement};
    use crate::scenarios::Marker;
    use std::sync::Arc;

    const CAS: &str = "https://accounts.staging.osf.io";

    fn login_form(dom: &mut crate::mock::MockDom) {
        dom.add(MockElement::new(LoginPage::IDENTITY));
        dom.add(MockElement::new(Selector::id("username")));
        dom.add(MockElement::new(Selector::id("password")));
        dom.add(MockElement::new(Selector::name("submit")));
        dom.add(MockElement::new(Selector::id("loginErrorMessage")));
        dom.on_click(Selector::name("submit"), |dom| {
            let message = if dom.value_of(&Selector::id("username")).is_empty() {
                "Email is required."
            } else if dom.value_of(&Selector::id("password")).is_empty() {
                "Password is required."
            } else {
                "The email or password you entered is incorrect."
            };
            dom.set_text(&Selector::id("loginErrorMessage"), message);
        });
    }

    fn session() -> (Arc<MockDriver>, Session) {
        let driver = Arc::new(MockDriver::new().with_route(format!("{CAS}/login"), |_, dom| {
            login_form(dom);
        }));
        let session = Session::new(driver.clone(), Settings::default());
        (driver, session)
    }

    mod registration_tests {
        use super::*;

        #[test]
        fn test_fixture_account_flows_are_not_run_on_prod() {
            for scenario in scenarios() {
                let needs_fixture = scenario.name.contains("two_factor")
                    || scenario.name.contains("terms_of_service")
                    || scenario.name.ends_with("account_disabled")
                    || scenario.name.ends_with("account_not_confirmed")
                    || scenario.name.contains("oauth");
                if needs_fixture {
                    assert!(scenario.has(Marker::DontRunOnProd), "{}", scenario.name);
                }
            }
        }

        #[test]
        fn test_institution_suite_is_smoke() {
            assert!(scenarios()
                .iter()
                .filter(|s| s.name.starts_with("login::institution::"))
                .all(|s| s.has(Marker::Smoke)));
        }
    }

    mod error_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_missing_email_message() {
            let (_, session) = session();
            missing_email(&session).await.unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_password_types_each_key() {
            let (driver, session) = session();
            missing_password(&session).await.unwrap();
            let keys = driver
                .calls()
                .into_iter()
                .filter(|c| c.starts_with("send_keys:"))
                .count();
            assert_eq!(keys, 3);
        }

        #[tokio::test(start_paused = true)]
        async fn test_invalid_credentials_message() {
            let (_, session) = session();
            invalid_email_and_password(&session).await.unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn test_wrong_message_fails_with_expected_and_actual() {
            let driver = Arc::new(MockDriver::new().with_route(format!("{CAS}/login"), |_, dom| {
                login_form(dom);
                dom.on_click(Selector::name("submit"), |dom| {
                    dom.set_text(&Selector::id("loginErrorMessage"), "Something else");
                });
            }));
            let session = Session::new(driver, Settings::default());
            let err = missing_email(&session).await.unwrap_err();
            let message = err.to_string();
            assert!(message.contains("Email is required."), "{message}");
            assert!(message.contains("Something else"), "{message}");
        }
    }

    mod oauth_tests {
        use super::*;
        use crate::result::ProbeError;

        #[tokio::test]
        async fn test_unconfigured_devapp_fails_before_navigating() {
            let (driver, session) = session();
            let err = deny_authorization(&session).await.unwrap_err();
            assert!(matches!(err, ProbeError::Config { .. }));
            assert!(err.to_string().contains("DEVAPP_CLIENT_ID"));
            assert!(driver.history().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn test_callback_param_reads_query() {
            let driver = Arc::new(MockDriver::new());
            let session = Session::new(driver, Settings::default());
            session
                .navigate("https://www.google.com/?code=ST-42&state=x")
                .await
                .unwrap();
            assert_eq!(callback_param(&session, "code").await.unwrap(), "ST-42");
            assert_eq!(callback_param(&session, "error").await.unwrap(), "");
        }
    }
}
