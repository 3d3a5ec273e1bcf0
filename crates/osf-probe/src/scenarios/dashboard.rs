//! Dashboard scenarios.

use crate::assertion::ensure;
use crate::page_object::{guid_url, Page};
use crate::pages::DashboardPage;
use crate::result::ProbeResult;
use crate::scenarios::{register, Scenario};
use crate::session::Session;
use crate::workflows::{create_project, delete_node, login_as};

/// The dashboard suite
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    register! {
        "dashboard::create_project_modal::cancel" [Smoke] => cancel_create_project,
        "dashboard::create_and_delete_project" [CoreFunctionality, DontRunOnProd] => create_and_delete_project,
    }
}

async fn cancel_create_project(session: &Session) -> ProbeResult<()> {
    login_as(session, &session.settings().credentials.user_one).await?;
    let dashboard = DashboardPage::new(session);
    dashboard.goto().await?;
    dashboard.create_project_button().click().await?;

    let modal = dashboard.create_project_modal();
    ensure(modal.project_name_input().appears().await?, "create project modal opened")?;
    modal.cancel_button().click().await?;
    ensure(modal.project_name_input().absent().await?, "create project modal closed")
}

async fn create_and_delete_project(session: &Session) -> ProbeResult<()> {
    login_as(session, &session.settings().credentials.user_one).await?;
    let title = format!("osf-probe {}", uuid::Uuid::new_v4());
    let url = create_project(session, &title).await?;
    let osf_home = &session.settings().osf_home;
    ensure(url.starts_with(osf_home), "new project lives under the OSF home")?;
    let guid = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    delete_node(session, &guid_url(osf_home, guid, "settings/")).await
}
