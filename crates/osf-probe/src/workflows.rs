//! Multi-step user journeys.
//!
//! Each step that used to sleep now waits on a condition: an element
//! resolving, the URL changing, or the URL reaching an expected value.

use crate::assertion::ensure;
use crate::config::Account;
use crate::page_object::Page;
use crate::pages::{DashboardPage, LoginPage, MeetingsPage, NodeSettingsPage, PrimaryDestination};
use crate::pages::navbars::DONATE_URL;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use crate::wait::{wait_for, WaitOptions};

/// Sign in through the CAS form
///
/// Does not wait for the redirect; the next page's verification does.
pub async fn login(session: &Session, user: &str, password: &str) -> ProbeResult<()> {
    tracing::info!(user, "login");
    let page = LoginPage::new(session);
    page.goto().await?;
    page.username_input().send_keys(user).await?;
    page.password_input().send_keys(password).await?;
    page.submit_button().click().await
}

/// [`login`] with a configured account
pub async fn login_as(session: &Session, account: &Account) -> ProbeResult<()> {
    if !account.is_configured() {
        return Err(ProbeError::config("account credentials are not configured"));
    }
    login(session, &account.email, &account.password).await
}

/// End the CAS session and return to OSF
pub async fn logout(session: &Session) -> ProbeResult<()> {
    let settings = session.settings();
    let url = format!("{}/logout?service={}/", settings.cas_domain, settings.osf_home);
    tracing::info!("logout");
    session.navigate(&url).await
}

/// Create a project from the dashboard and return its URL
pub async fn create_project(session: &Session, title: &str) -> ProbeResult<String> {
    tracing::info!(title, "create project");
    let dashboard = DashboardPage::new(session);
    dashboard.goto().await?;
    dashboard.create_project_button().click().await?;

    let modal = dashboard.create_project_modal();
    modal.project_name_input().send_keys(title).await?;
    modal.create_project_button().click().await?;

    let before = session.current_url().await?;
    dashboard
        .project_created_modal()
        .go_to_project_href_link()
        .click()
        .await?;
    left_page(session, &before).await?;

    let url = session.current_url().await?;
    tracing::info!(%url, "project created");
    Ok(url)
}

/// Delete a node from its settings page at `url`
///
/// Fails unless confirming the dialog navigates away from the settings page.
pub async fn delete_node(session: &Session, url: &str) -> ProbeResult<()> {
    tracing::info!(url, "delete node");
    session.navigate(url).await?;
    let settings = NodeSettingsPage::open(session, true).await?;
    settings.delete_node_button().click().await?;

    let dialog = settings.delete_dialog();
    let word = dialog.confirm_word().text().await?;
    dialog.confirm_input().send_keys(&word).await?;
    dialog.confirm_button().click().await?;

    left_page(session, url).await?;
    tracing::info!(url, "node deleted");
    Ok(())
}

/// Walk every meetings navbar destination and check where each lands
///
/// Every click must leave the meetings page. The Meetings entry reloads the
/// page in place, which shows as the list placeholder coming back.
pub async fn check_meetings_navigation(session: &Session) -> ProbeResult<()> {
    let meetings = MeetingsPage::new(session);
    meetings.goto().await?;
    let navbar = meetings.navbar();
    let home = session.settings().osf_home.trim_end_matches('/');

    for destination in PrimaryDestination::ALL {
        let before = session.current_url().await?;
        if destination == PrimaryDestination::Meetings {
            ensure(
                meetings.skeleton_row().absent().await?,
                "meetings list finished loading",
            )?;
        }
        navbar.primary_toggle().click().await?;
        navbar.primary_item(destination).click().await?;
        match destination {
            PrimaryDestination::Home => {
                left_page(session, &before).await?;
                expect_url(session, &format!("{home}/")).await?;
            }
            PrimaryDestination::Meetings => {
                ensure(
                    meetings.skeleton_row().appears().await?,
                    "meetings page reloaded",
                )?;
                meetings.ensure_verified().await?;
            }
            PrimaryDestination::Preprints | PrimaryDestination::Registries => {
                left_page(session, &before).await?;
                expect_url_contains(session, &format!("{home}{}", destination.path())).await?;
            }
        }
        go_back(session, &before).await?;
    }

    let before = session.current_url().await?;
    navbar.support_link().click().await?;
    left_page(session, &before).await?;
    expect_url_contains(session, &format!("{home}/support/")).await?;
    go_back(session, &before).await?;

    navbar.donate_link().click().await?;
    left_page(session, &before).await?;
    expect_url_contains(session, DONATE_URL).await?;
    go_back(session, &before).await
}

async fn left_page(session: &Session, from: &str) -> ProbeResult<()> {
    let waited = session
        .wait_for_url_change(from, session.timeouts().long())
        .await;
    landed(session, waited.map(|_| ()), "other than", from).await
}

async fn go_back(session: &Session, to: &str) -> ProbeResult<()> {
    let landed = session.current_url().await?;
    session.back().await?;
    if landed != to {
        expect_url(session, to).await?;
    }
    Ok(())
}

/// Wait (long timeout) for the URL to contain `expected`
///
/// Expiry is an assertion failure naming the URL actually reached.
pub async fn expect_url_contains(session: &Session, expected: &str) -> ProbeResult<()> {
    let waited = session
        .wait_for_url_contains(expected, session.timeouts().long())
        .await;
    landed(session, waited.map(|_| ()), "containing", expected).await
}

/// Wait (long timeout) for the URL to equal `expected`
pub async fn expect_url(session: &Session, expected: &str) -> ProbeResult<()> {
    let driver = session.driver();
    let waited = wait_for(
        WaitOptions::from_timeouts(session.timeouts(), session.timeouts().long()),
        format!("url {expected}"),
        move || async move { driver.current_url().await.map(|url| url == expected) },
    )
    .await;
    landed(session, waited.map(|_| ()), "equal to", expected).await
}

async fn landed(
    session: &Session,
    waited: ProbeResult<()>,
    relation: &str,
    expected: &str,
) -> ProbeResult<()> {
    match waited {
        Err(ProbeError::Timeout { .. }) => {
            let actual = session.current_url().await?;
            tracing::warn!(expected, %actual, "unexpected landing url");
            Err(ProbeError::assertion(format!(
                "expected url {relation} '{expected}', got '{actual}'"
            )))
        }
        other => other,
    }
}
