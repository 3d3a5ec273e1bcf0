//! Meetings scenarios.

use crate::assertion::ensure;
use crate::page_object::Page;
use crate::pages::MeetingsPage;
use crate::result::ProbeResult;
use crate::scenarios::{register, Scenario};
use crate::session::Session;
use crate::workflows::check_meetings_navigation;

/// The meetings suite
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    register! {
        "meetings::landing::panels_and_list" [Smoke] => panels_and_list,
        "meetings::navbar::destinations" [Smoke, CoreFunctionality] => navbar_destinations,
    }
}

async fn panels_and_list(session: &Session) -> ProbeResult<()> {
    let page = MeetingsPage::new(session);
    page.goto().await?;
    ensure(page.register_button().present().await?, "register panel is shown")?;
    ensure(page.upload_button().present().await?, "upload panel is shown")?;
    ensure(
        page.skeleton_row().here_then_gone().await?,
        "meetings list finished loading",
    )?;
    ensure(
        page.top_meeting_link().appears().await?,
        "meetings list has an entry",
    )
}

async fn navbar_destinations(session: &Session) -> ProbeResult<()> {
    check_meetings_navigation(session).await
}
