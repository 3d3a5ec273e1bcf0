//! Scripted OSF site for integration tests.
//!
//! One [`MockDriver`] serving the CAS sign-in flows and the OSF pages they
//! hand over to. Sign-in state lives outside the document so it survives
//! navigation, the way a session cookie would.

#![allow(dead_code)]

use osf_probe::pages::login::{COS_URL, PRIVACY_POLICY_URL, STATUS_URL, TERMS_OF_USE_URL};
use osf_probe::pages::navbars::DONATE_URL;
use osf_probe::{
    Account, MockDom, MockDriver, MockElement, PrimaryDestination, Selector, Session, Settings,
    Strategy,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const HOME: &str = "https://staging.osf.io";
pub const CAS: &str = "https://accounts.staging.osf.io";

pub const SIGN_IN_HELP_URL: &str = "https://help.osf.io/article/237-Sign-in-to-OSF";
pub const TWO_FACTOR_HELP_URL: &str =
    "https://help.osf.io/article/165-Enable-or-Disable-Two-Factor-Authentication";
pub const ORCID_URL: &str = "https://orcid.org/signin?client_id=APP-OSF&response_type=code\
     &redirect_uri=https://accounts.staging.osf.io/oauth2.0/callbackAuthorize";

pub const DEVAPP_CLIENT_ID: &str = "osf-probe-devapp";
pub const OAUTH_REDIRECT: &str = "https://www.google.com/";
const OAUTH_SCOPES: [&str; 10] = [
    "osf.full_read",
    "osf.full_write",
    "osf.users.email_read",
    "osf.users.profile_read",
    "osf.users.profile_write",
    "osf.nodes.metadata_read",
    "osf.nodes.metadata_write",
    "osf.nodes.access_read",
    "osf.nodes.access_write",
    "osf.nodes.data_read",
];

const BRAND: Selector = Selector::css("a.navbar-brand");
const SUBMIT: Selector = Selector::name("submit");
const USERNAME: Selector = Selector::id("username");
const PASSWORD: Selector = Selector::id("password");
const ERROR: Selector = Selector::id("loginErrorMessage");
const ONE_TIME_PASSWORD: Selector = Selector::id("oneTimePassword");
const TOS_CHECKBOX: Selector = Selector::id("termsOfServiceChecked");
const TOS_CONTINUE: Selector = Selector::id("primarySubmitButton");
const INSTITUTION_SELECT: Selector = Selector::id("institutionSelect");
const INSTITUTION_SUBMIT: Selector = Selector::id("institutionSubmit");

const MODAL_INPUT: Selector = Selector::name("projectName");
const MODAL_CANCEL: Selector =
    Selector::css("#addProjectFromHome > div > div > div.modal-footer > button.btn.btn-default");
const CREATE_PROJECT: Selector =
    Selector::xpath("//*[@id='osfHome']/div[3]/div/div/div/div/div[1]/m-b-lg/div/span/button");

const MODAL_CREATE: Selector =
    Selector::css("#addProjectFromHome > div > div > div.modal-footer > button.btn.btn-success");
const GO_TO_PROJECT: Selector = Selector::xpath("//a[text()=\"Go to new project\"]");
const DELETE_NODE: Selector = Selector::xpath("//*[@id='deleteNode']");
const CONFIRM_WORD: Selector = Selector::xpath("/html/body/div[6]/div/div/div[2]/div/p[2]/strong");
const CONFIRM_INPUT: Selector = Selector::id("bbConfirmText");
const CONFIRM_BUTTON: Selector = Selector::xpath("/html/body/div[6]/div/div/div[3]/button[2]");

/// Guid the site gives the project it creates
pub const PROJECT_GUID: &str = "pr0j1";
/// Word the delete dialog asks for
pub const CONFIRM: &str = "scientist";

#[derive(Debug, Default)]
struct SiteState {
    signed_in: bool,
    /// Title of the live project, if one was created and not deleted
    project: Option<String>,
}

type Shared = Arc<Mutex<SiteState>>;

/// Fixture accounts and the CAS flow each one is sent to; `None` signs in
type Landings = Arc<Vec<(Account, Option<&'static str>)>>;

fn signed_in(state: &Shared) -> bool {
    state.lock().map(|s| s.signed_in).unwrap_or(false)
}

fn set_signed_in(state: &Shared, value: bool) {
    if let Ok(mut s) = state.lock() {
        s.signed_in = value;
    }
}

fn account(name: &str) -> Account {
    Account::new(format!("{name}@osf-probe.test"), format!("{name}-secret"))
}

/// Default settings with every fixture account configured
pub fn settings() -> Settings {
    let mut settings = Settings::default();
    let credentials = &mut settings.credentials;
    credentials.user_one = account("user-one");
    credentials.user_two = account("user-two");
    credentials.two_factor_user = account("two-factor");
    credentials.tos_user = account("tos");
    credentials.unconfirmed_user = account("unconfirmed");
    credentials.deactivated_user = account("deactivated");
    credentials.devapp_client_id = DEVAPP_CLIENT_ID.to_string();
    settings
}

fn landings(settings: &Settings) -> Vec<(Account, Option<&'static str>)> {
    let c = &settings.credentials;
    vec![
        (c.user_one.clone(), None),
        (c.user_two.clone(), None),
        (c.two_factor_user.clone(), Some("2fa")),
        (c.tos_user.clone(), Some("tos")),
        (c.unconfirmed_user.clone(), Some("unconfirmed")),
        (c.deactivated_user.clone(), Some("disabled")),
    ]
}

/// The scripted site
pub fn site(settings: &Settings) -> Arc<MockDriver> {
    site_with_state(settings).0
}

/// The scripted site and the project it holds
pub fn site_with_project(settings: &Settings) -> (Arc<MockDriver>, Project) {
    let (driver, state) = site_with_state(settings);
    (driver, Project(state))
}

/// Read access to the site's project
pub struct Project(Shared);

impl Project {
    /// Title of the live project, `None` once deleted
    pub fn title(&self) -> Option<String> {
        self.0.lock().ok().and_then(|s| s.project.clone())
    }
}

fn site_with_state(settings: &Settings) -> (Arc<MockDriver>, Shared) {
    let state: Shared = Arc::default();
    let accounts = Arc::new(landings(settings));

    let cas_state = Arc::clone(&state);
    let dashboard_state = Arc::clone(&state);
    let settings_state = Arc::clone(&state);
    let project_state = Arc::clone(&state);
    let driver = Arc::new(
        MockDriver::new()
            .with_route(CAS, move |url, dom| {
                cas(url, dom, &cas_state, &accounts);
            })
            .with_route(format!("{HOME}/"), |_, dom| landing(dom))
            .with_route(format!("{HOME}/register"), |_, dom| {
                dom.add(MockElement::new(Selector::css("form#signUpForm")));
            })
            .with_route(format!("{HOME}/forgotpassword/"), |_, dom| {
                dom.add(MockElement::new(Selector::id("forgotPasswordForm")));
            })
            .with_route(format!("{HOME}/meetings"), |_, dom| meetings(dom))
            .with_route(format!("{HOME}/dashboard"), move |_, dom| {
                dashboard(dom, &dashboard_state);
            })
            .with_route(format!("{HOME}/{PROJECT_GUID}/"), move |_, dom| {
                if live_project(&project_state) {
                    dom.add(MockElement::new(Selector::id("projectScope")));
                }
            })
            .with_route(format!("{HOME}/{PROJECT_GUID}/settings/"), move |_, dom| {
                node_settings(dom, &settings_state);
            }),
    );
    (driver, state)
}

/// A fresh site and a session on it
pub fn session() -> (Arc<MockDriver>, Session) {
    let settings = settings();
    let driver = site(&settings);
    let session = Session::new(driver.clone(), settings);
    (driver, session)
}

fn query_value<'u>(url: &'u str, key: &str) -> Option<&'u str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

// =============================================================================
// CAS
// =============================================================================

fn cas(url: &str, dom: &mut MockDom, state: &Shared, accounts: &Landings) {
    let path = url.trim_start_matches(CAS);
    let path = path.split('?').next().unwrap_or_default();

    match path {
        "/login" | "/login/" => {
            if query_value(url, "service") == Some("https://noservice.osf.io/") {
                card(dom, "OSF HOME", "Service not authorized", None);
            } else if query_value(url, "verification_key").is_some() {
                card(dom, "OSF HOME", "Verification key login failed", None);
            } else {
                match (query_value(url, "campaign"), query_value(url, "flow")) {
                    (Some("institution"), _) => institution_login(dom),
                    (Some("unsupportedinstitution"), _) => unsupported_institution(dom),
                    (_, Some("2fa")) => two_factor(dom),
                    (_, Some("tos")) => terms_of_service(dom),
                    (_, Some("unconfirmed")) => card(dom, "OSF HOME", "Account not confirmed", None),
                    (_, Some("disabled")) => card(dom, "OSF HOME", "Account disabled", None),
                    _ if signed_in(state) => status_card(dom, "Login successful"),
                    _ => login_form(dom, state, accounts),
                }
            }
        }
        "/logout" => {
            set_signed_in(state, false);
            match query_value(url, "service") {
                Some(service) => dom.navigate_to(service),
                None => status_card(dom, "Logout successful"),
            }
        }
        "/oauth2/authorize" => authorize(url, dom),
        _ => card(dom, "OSF CAS", "Page Not Found", None),
    }
}

fn authorize(url: &str, dom: &mut MockDom) {
    let failed = |dom: &mut MockDom, detail: &str| {
        card(dom, "OSF HOME", "Authorization failed", Some(detail));
    };
    let redirect = query_value(url, "redirect_uri").unwrap_or_default();
    let scope = query_value(url, "scope").unwrap_or_default();
    match query_value(url, "client_id") {
        None | Some("") => failed(dom, "missing_request_param: client_id"),
        Some(id) if id != DEVAPP_CLIENT_ID => failed(dom, &format!("invalid_client_id: {id}")),
        _ if redirect != OAUTH_REDIRECT => {
            failed(dom, &format!("invalid_redirect_url: {redirect}"));
        }
        _ if !scope.split(' ').all(|s| OAUTH_SCOPES.contains(&s)) => {
            failed(dom, &format!("invalid_scope: {scope}"));
        }
        _ => authorization_prompt(dom),
    }
}

fn authorization_prompt(dom: &mut MockDom) {
    let allow = Selector::name("allow");
    let deny = Selector::name("deny");
    dom.add(MockElement::new(BRAND).text("OSF HOME").href(format!("{HOME}/")));
    dom.add(MockElement::new(Selector::css("div.card-message > h2")).text("Approve or deny authorization"));
    dom.add(
        MockElement::new(Selector::css("form#fm1 button[name=\"allow\"]"))
            .matching(allow.clone()),
    );
    dom.add(MockElement::new(deny.clone()));
    dom.on_click_navigate(allow, format!("{OAUTH_REDIRECT}?code=ST-1-osf-probe"));
    dom.on_click_navigate(deny, format!("{OAUTH_REDIRECT}?error=access_denied"));
}

fn card(dom: &mut MockDom, brand: &str, status: &str, detail: Option<&str>) {
    dom.add(MockElement::new(BRAND).text(brand).href(format!("{HOME}/")));
    dom.add(MockElement::new(Selector::css("div.card-message")).key("card"));
    dom.add(
        MockElement::new(Selector::css("div.card-message > h2"))
            .text(status)
            .child_of("card"),
    );
    if let Some(detail) = detail {
        dom.add(
            MockElement::new(Selector::css("div.card-message > pre"))
                .text(detail)
                .child_of("card"),
        );
    }
}

fn status_card(dom: &mut MockDom, status: &str) {
    card(dom, "OSF HOME", status, None);
    dom.add(
        MockElement::new(Selector::css("div.card-message > p"))
            .text("Auto-redirection didn't happen ...")
            .child_of("card"),
    );
}

fn footer(dom: &mut MockDom) {
    dom.add(MockElement::new(Selector::css("a[href=\"https://www.cos.io/\"]")).href(COS_URL));
    dom.add(
        MockElement::new(Selector::css("#footer a[href$=\"TERMS_OF_USE.md\"]"))
            .href(TERMS_OF_USE_URL),
    );
    dom.add(
        MockElement::new(Selector::css("#footer a[href$=\"PRIVACY_POLICY.md\"]"))
            .href(PRIVACY_POLICY_URL),
    );
    dom.add(MockElement::new(Selector::css("a[href=\"https://status.cos.io/\"]")).href(STATUS_URL));
}

fn osf_links(dom: &mut MockDom) {
    dom.add(MockElement::new(BRAND).text("OSF HOME").href(format!("{HOME}/")));
    dom.add(MockElement::new(Selector::link_text("Sign up")).href(format!("{HOME}/register")));
    dom.add(MockElement::new(Selector::link_text("Need help?")).href(SIGN_IN_HELP_URL));
}

fn login_form(dom: &mut MockDom, state: &Shared, accounts: &Landings) {
    dom.add(MockElement::new(Selector::id("fm1")));
    dom.add(MockElement::new(USERNAME));
    dom.add(MockElement::new(PASSWORD));
    dom.add(MockElement::new(SUBMIT));
    dom.add(MockElement::new(ERROR));
    dom.add(MockElement::new(Selector::id("rememberMe")));
    dom.add(MockElement::new(Selector::id("instnLogin")).href(format!("{CAS}/login?campaign=institution")));
    dom.add(MockElement::new(Selector::id("orcidlogin")).href(ORCID_URL));
    dom.add(
        MockElement::new(Selector::link_text("Reset password")).href(format!("{HOME}/forgotpassword/")),
    );
    osf_links(dom);
    footer(dom);

    let state = Arc::clone(state);
    let accounts = Arc::clone(accounts);
    dom.on_click(SUBMIT, move |dom| {
        let email = dom.value_of(&USERNAME);
        let password = dom.value_of(&PASSWORD);
        if email.is_empty() {
            dom.set_text(&ERROR, "Email is required.");
            return;
        }
        if password.is_empty() {
            dom.set_text(&ERROR, "Password is required.");
            return;
        }
        let landing = accounts
            .iter()
            .find(|(a, _)| a.email == email && a.password == password)
            .map(|(_, flow)| *flow);
        match landing {
            Some(None) => {
                set_signed_in(&state, true);
                dom.navigate_to(format!("{HOME}/dashboard"));
            }
            Some(Some(flow)) => dom.navigate_to(format!("{CAS}/login?flow={flow}")),
            None => dom.set_text(&ERROR, "The email or password you entered is incorrect."),
        }
    });
}

fn cancel_link(dom: &mut MockDom) {
    dom.add(
        MockElement::new(Selector::link_text("Cancel"))
            .href(format!("{CAS}/logout?service={HOME}/")),
    );
}

fn two_factor(dom: &mut MockDom) {
    dom.add(MockElement::new(USERNAME).property("value", "two-factor@osf-probe.test"));
    dom.add(MockElement::new(ONE_TIME_PASSWORD));
    dom.add(MockElement::new(SUBMIT));
    dom.add(MockElement::new(ERROR));
    dom.add(MockElement::new(Selector::link_text("Need help?")).href(TWO_FACTOR_HELP_URL));
    cancel_link(dom);
    dom.on_click(SUBMIT, |dom| {
        let message = if dom.value_of(&ONE_TIME_PASSWORD).is_empty() {
            "One-time password is required."
        } else {
            "The one-time password you entered is incorrect."
        };
        dom.set_text(&ERROR, message);
    });
}

fn terms_of_service(dom: &mut MockDom) {
    dom.add(MockElement::new(TOS_CHECKBOX));
    dom.add(MockElement::new(TOS_CONTINUE).disabled());
    dom.add(MockElement::new(Selector::link_text("Terms of Use")).href(TERMS_OF_USE_URL));
    dom.add(MockElement::new(Selector::link_text("Privacy Policy")).href(PRIVACY_POLICY_URL));
    cancel_link(dom);
    dom.on_click(TOS_CHECKBOX, |dom| dom.set_enabled(&TOS_CONTINUE, true));
}

fn institution_login(dom: &mut MockDom) {
    dom.add(MockElement::new(INSTITUTION_SELECT));
    for name in ["-- select an institution --", "Center For Open Science", "OSF Institution"] {
        dom.add(MockElement::new(Selector::css("#institutionSelect > option")).text(name));
    }
    dom.add(MockElement::new(INSTITUTION_SUBMIT).disabled());
    dom.add(
        MockElement::new(Selector::link_text("I can't find my institution"))
            .href(format!("{CAS}/login?campaign=unsupportedinstitution")),
    );
    dom.add(MockElement::new(Selector::link_text("Sign in with OSF")).href(format!("{CAS}/login")));
    osf_links(dom);
    footer(dom);
    dom.on_click(INSTITUTION_SELECT, |dom| dom.set_enabled(&INSTITUTION_SUBMIT, true));
}

fn unsupported_institution(dom: &mut MockDom) {
    dom.add(MockElement::new(Selector::css("div[data-test-unsupported-institution]")));
    dom.add(MockElement::new(Selector::link_text("Sign in with OSF")).href(format!("{CAS}/login")));
    dom.add(MockElement::new(Selector::link_text("Need help?")).href(SIGN_IN_HELP_URL));
}

// =============================================================================
// OSF
// =============================================================================

fn landing(dom: &mut MockDom) {
    dom.add(MockElement::new(Selector::css("[data-test-hero-heading]")).text("Open Science Framework"));
    dom.add(MockElement::new(Selector::css("a[data-test-sign-up-button]")).href(format!("{HOME}/register")));
}

fn meetings(dom: &mut MockDom) {
    dom.add(MockElement::new(Selector::css("img[alt=\"Logo for OSF meeting\"]")));
    dom.add(MockElement::new(Selector::css("button[data-test-register-button]")));
    dom.add(MockElement::new(Selector::css("button[data-test-upload-button]")));
    dom.add(
        MockElement::new(Selector::css("div[data-test-ember-content-placeholders-text-line]"))
            .vanish_after(Duration::from_secs(3)),
    );
    dom.add(
        MockElement::new(Selector::css("div[data-test-meetings-list-item-name] > a"))
            .text("Society for Personality and Social Psychology")
            .href(format!("{HOME}/view/spsp2024/"))
            .appear_after(Duration::from_secs(3)),
    );

    dom.add(MockElement::new(Selector::css("#primary-navigation > span")));
    for destination in PrimaryDestination::ALL {
        let pattern = format!(
            "#navbarScope > div > div.navbar-header > div.dropdown.primary-nav.open > ul > li:nth-child({}) > a > b",
            destination.position()
        );
        dom.add(
            MockElement::new(Selector::dynamic(Strategy::Css, pattern))
                .href(format!("{HOME}{}", destination.path())),
        );
    }
    dom.add(
        MockElement::new(Selector::css("#secondary-navigation > ul > li:nth-child(2) > a"))
            .href(format!("{HOME}/support/")),
    );
    dom.add(
        MockElement::new(Selector::css(
            "#secondary-navigation > ul > li.navbar-donate-button > a",
        ))
        .href(DONATE_URL),
    );
}

fn live_project(state: &Shared) -> bool {
    state.lock().map(|s| s.project.is_some()).unwrap_or(false)
}

fn dashboard(dom: &mut MockDom, state: &Shared) {
    dom.add(MockElement::new(Selector::id("osfHome")));
    dom.add(MockElement::new(CREATE_PROJECT));
    dom.on_click(CREATE_PROJECT, |dom| {
        dom.add(MockElement::new(MODAL_INPUT));
        dom.add(MockElement::new(MODAL_CANCEL));
        dom.add(MockElement::new(MODAL_CREATE));
    });
    dom.on_click(MODAL_CANCEL, |dom| {
        dom.remove(&MODAL_INPUT);
        dom.remove(&MODAL_CANCEL);
        dom.remove(&MODAL_CREATE);
    });

    let state = Arc::clone(state);
    dom.on_click(MODAL_CREATE, move |dom| {
        let title = dom.value_of(&MODAL_INPUT);
        if title.is_empty() {
            return;
        }
        if let Ok(mut s) = state.lock() {
            s.project = Some(title);
        }
        dom.remove(&MODAL_INPUT);
        dom.remove(&MODAL_CANCEL);
        dom.remove(&MODAL_CREATE);
        dom.add(
            MockElement::new(GO_TO_PROJECT)
                .text("Go to new project")
                .href(format!("{HOME}/{PROJECT_GUID}/"))
                .appear_after(Duration::from_secs(2)),
        );
    });
}

fn node_settings(dom: &mut MockDom, state: &Shared) {
    if !live_project(state) {
        return;
    }
    dom.add(MockElement::new(DELETE_NODE));
    dom.on_click(DELETE_NODE, |dom| {
        dom.add(MockElement::new(CONFIRM_WORD).text(CONFIRM));
        dom.add(MockElement::new(CONFIRM_INPUT));
        dom.add(MockElement::new(CONFIRM_BUTTON));
    });

    let state = Arc::clone(state);
    dom.on_click(CONFIRM_BUTTON, move |dom| {
        if dom.value_of(&CONFIRM_INPUT) != CONFIRM {
            return;
        }
        if let Ok(mut s) = state.lock() {
            s.project = None;
        }
        dom.navigate_to(format!("{HOME}/dashboard/"));
    });
}
