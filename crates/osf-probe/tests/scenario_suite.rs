//! Registered scenarios against the scripted OSF site
//!
//! Every scenario runs end to end on the mock driver with tokio's clock
//! paused, so long waits cost nothing.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use osf_probe::scenarios::run_sequential;
use osf_probe::{Domain, Registry, ScenarioOutcome, Settings};

async fn run(name: &str) -> ScenarioOutcome {
    let (_, session) = common::session();
    let registry = Registry::all();
    let scenario = registry
        .get(name)
        .unwrap_or_else(|| panic!("{name} is not registered"));
    scenario.execute(&session).await
}

async fn run_group(prefix: &str) -> usize {
    let names: Vec<&str> = Registry::all()
        .scenarios()
        .iter()
        .map(|s| s.name)
        .filter(|name| name.starts_with(prefix))
        .collect();
    assert!(!names.is_empty(), "no scenarios under {prefix}");
    for name in &names {
        let outcome = run(name).await;
        assert!(outcome.passed, "{name}: {:?}", outcome.error);
    }
    names.len()
}

// ============================================================================
// Login suite
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_login_page_links() {
    assert_eq!(run_group("login::page::").await, 10);
}

#[tokio::test(start_paused = true)]
async fn test_two_factor_flow() {
    assert_eq!(run_group("login::two_factor::").await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_terms_of_service_flow() {
    assert_eq!(run_group("login::terms_of_service::").await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_generic_status_pages() {
    assert_eq!(run_group("login::generic::").await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_login_errors() {
    assert_eq!(run_group("login::errors::").await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_exception_pages() {
    assert_eq!(run_group("login::exceptions::").await, 6);
}

#[tokio::test(start_paused = true)]
async fn test_oauth_prompt_and_failures() {
    assert_eq!(run_group("login::oauth::").await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_institution_login() {
    assert_eq!(run_group("login::institution::").await, 10);
}

// ============================================================================
// Meetings and dashboard
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_meetings_suite() {
    assert_eq!(run_group("meetings::").await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_suite() {
    assert_eq!(run_group("dashboard::").await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_oauth_without_devapp_fails_with_config_error() {
    let mut settings = common::settings();
    settings.credentials.devapp_client_id.clear();
    let session = osf_probe::Session::new(common::site(&settings), settings);
    let outcome = Registry::all()
        .get("login::oauth::allow_authorization")
        .expect("registered")
        .execute(&session)
        .await;
    assert!(!outcome.passed);
    assert!(outcome.error.unwrap().contains("DEVAPP_CLIENT_ID"));
}

#[tokio::test(start_paused = true)]
async fn test_missing_email_outcome_names_scenario() {
    let outcome = run("login::errors::missing_email").await;
    assert!(outcome.passed);
    assert_eq!(outcome.name, "login::errors::missing_email");
    assert!(outcome.error.is_none());
}

// ============================================================================
// Sequential runs
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_sequential_login_run_signs_out_between_scenarios() {
    let (driver, session) = common::session();
    let registry = Registry::all();
    let selected = registry.select(Some("login::"), session.settings());
    let mut seen = 0;
    let report = run_sequential(&session, &selected, false, |_| seen += 1).await;

    assert_eq!(seen, selected.len());
    assert!(report.all_passed(), "{:?}", report.failures());
    let logouts = driver
        .history()
        .iter()
        .filter(|url| url.starts_with(&format!("{}/logout?service=", common::CAS)))
        .count();
    assert!(logouts >= selected.len());
}

#[tokio::test(start_paused = true)]
async fn test_wrong_password_fails_the_run() {
    let mut settings = common::settings();
    let driver = common::site(&settings);
    settings.credentials.two_factor_user.password = "stale".to_string();
    let session = osf_probe::Session::new(driver, settings);

    let registry = Registry::all();
    let scenario = registry
        .get("login::two_factor::cancel")
        .expect("registered");
    let report = run_sequential(&session, &[scenario], true, |_| {}).await;

    assert_eq!(report.failed_count(), 1);
    let failure = report.failures()[0];
    let error = failure.error.as_deref().unwrap();
    assert!(error.contains("expected Login2FAPage"), "{error}");
}

#[test]
fn test_production_selection_skips_fixture_flows() {
    let registry = Registry::all();
    let settings = Settings::for_domain(Domain::Prod);
    let selected = registry.select(Some("login::"), &settings);
    assert!(!selected.is_empty());
    assert!(selected
        .iter()
        .all(|s| !s.name.starts_with("login::two_factor::")));
}
