//! Dashboard page, its project lists and the create-project modals.
//!
//! Both the legacy (knockout) and the Ember dashboard widgets are modelled;
//! which one renders depends on the deployment.

use crate::locator::{Element, Selector, Strategy, Wait};
use crate::page_object::{component, elements, groups, page, Component, Page};
use crate::result::{ProbeError, ProbeResult};

const TITLE_INPUT: Selector = Selector::css(".form-control");

/// Whether the logo named `institution` inside `modal` is selected
///
/// Unselected logos render at opacity 0.25. Any failure to find or read the
/// logo is reported as [`ProbeError::InstitutionLogoMissing`].
pub async fn institution_selected(modal: Element<'_>, institution: &str) -> ProbeResult<bool> {
    let logo = modal.find(Selector::dynamic(Strategy::Name, institution).with_wait(Wait::Quick));
    match logo.css_value("opacity").await {
        Ok(opacity) => Ok(!opacity.contains("0.25")),
        Err(e) => {
            tracing::debug!(institution, error = %e, "logo lookup failed");
            Err(ProbeError::InstitutionLogoMissing {
                institution: institution.to_string(),
            })
        }
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

page! {
    /// Signed-in user's dashboard
    DashboardPage
}

impl DashboardPage {
    elements! {
        /// Opens [`CreateProjectModal`]
        create_project_button: Selector::xpath(
            "//*[@id='osfHome']/div[3]/div/div/div/div/div[1]/m-b-lg/div/span/button",
        );
    }

    /// Legacy create-project modal
    #[must_use]
    pub fn create_project_modal(&self) -> CreateProjectModal {
        CreateProjectModal::new(&self.session)
    }

    /// Confirmation shown once a project was created
    #[must_use]
    pub fn project_created_modal(&self) -> ProjectCreatedModal {
        ProjectCreatedModal::new(&self.session)
    }

    /// Legacy quick-search project list
    #[must_use]
    pub fn project_list(&self) -> ProjectList {
        ProjectList::new(&self.session)
    }

    /// Ember create-project modal
    #[must_use]
    pub fn ember_create_project_modal(&self) -> EmberCreateProjectModal {
        EmberCreateProjectModal::new(&self.session)
    }

    /// Ember confirmation modal
    #[must_use]
    pub fn ember_project_created_modal(&self) -> EmberProjectCreatedModal {
        EmberProjectCreatedModal::new(&self.session)
    }

    /// Ember project list
    #[must_use]
    pub fn ember_project_list(&self) -> EmberProjectList {
        EmberProjectList::new(&self.session)
    }
}

impl Page for DashboardPage {
    const IDENTITY: Selector = Selector::id("osfHome").with_wait(Wait::Long);

    fn url(&self) -> Option<String> {
        Some(format!("{}/dashboard", self.session.settings().osf_home))
    }
}

// =============================================================================
// MODALS
// =============================================================================

component! {
    /// Legacy create-project modal
    CreateProjectModal
}

impl CreateProjectModal {
    elements! {
        modal: Selector::id("addProjectFromHome");
        project_name_input: Selector::name("projectName");
        create_project_button: Selector::css(
            "#addProjectFromHome > div > div > div.modal-footer > button.btn.btn-success",
        );
        cancel_button: Selector::css(
            "#addProjectFromHome > div > div > div.modal-footer > button.btn.btn-default",
        );
        select_all_link: Selector::link_text("Select all");
        remove_all_link: Selector::link_text("Remove all");
        more_arrow: Selector::css(
            "#addProjectFromHome > div > div > div.modal-body > div > div.text-muted.pointer",
        );
        description_input: Selector::css(
            "#addProjectFromHome > div > div > div.modal-body > div > div:nth-child(4) > input",
        );
        template_dropdown: Selector::id("select2-chosen-2");
    }

    /// Title field, looked up inside the modal
    #[must_use]
    pub fn title_input(&self) -> Element<'_> {
        self.modal().find(TITLE_INPUT)
    }

    /// Whether the institution's logo is selected
    pub async fn institution_selected(&self, institution: &str) -> ProbeResult<bool> {
        institution_selected(self.modal(), institution).await
    }
}

component! {
    /// Ember create-project modal
    EmberCreateProjectModal
}

impl EmberCreateProjectModal {
    elements! {
        modal: Selector::class_name("modal-dialog");
        create_project_button: Selector::css("button.btn:nth-child(2)");
        cancel_button: Selector::css("button.btn:nth-child(1)");
        select_all_link: Selector::link_text("Select all");
        remove_all_link: Selector::link_text("Remove all");
        more_arrow: Selector::class_name("fa");
        description_input: Selector::class_name("project-desc");
        template_dropdown: Selector::class_name("ember-power-select-placeholder");
    }

    /// Title field, looked up inside the modal
    #[must_use]
    pub fn title_input(&self) -> Element<'_> {
        self.modal().find(Selector::class_name("form-control"))
    }

    /// Whether the institution's logo is selected
    pub async fn institution_selected(&self, institution: &str) -> ProbeResult<bool> {
        institution_selected(self.modal(), institution).await
    }
}

component! {
    /// Legacy project-created confirmation
    ProjectCreatedModal
}

impl ProjectCreatedModal {
    elements! {
        go_to_project_href_link: Selector::xpath("//a[text()=\"Go to new project\"]")
            .with_wait(Wait::Long);
        keep_working_here_button: Selector::css(
            "#addProjectFromHome > div > div > div > div.modal-footer > button",
        );
    }
}

component! {
    /// Ember project-created confirmation
    EmberProjectCreatedModal
}

impl EmberProjectCreatedModal {
    elements! {
        go_to_project_href_link: Selector::css(".__fe314__modal.modal a").with_wait(Wait::Long);
        keep_working_here_button: Selector::css("button.btn-default");
    }
}

// =============================================================================
// PROJECT LISTS
// =============================================================================

const QUICK_SEARCH_ROW: &str = "div.quick-search-table > div:nth-child(3) > a";

component! {
    /// Legacy quick-search project list
    ProjectList
}

impl ProjectList {
    elements! {
        search_input: Selector::id("searchQuery");
        top_project_link: Selector::css("div.quick-search-table > div:nth-child(3) > a:nth-child(1)");
        sort_title_asc_button: Selector::css(
            "div.quick-search-table > div.row.node-col-headers.m-t-md > div.col-sm-3.col-md-6 > div > button:nth-child(1)",
        );
        sort_title_dsc_button: Selector::css(
            "div.quick-search-table > div.row.node-col-headers.m-t-md > div.col-sm-3.col-md-6 > div > button:nth-child(2)",
        );
        sort_date_asc_button: Selector::css(
            "div.quick-search-table > div.row.node-col-headers.m-t-md > div:nth-child(3) > div > span > button:nth-child(1)",
        );
        sort_date_dsc_button: Selector::css(
            "div.quick-search-table > div.row.node-col-headers.m-t-md > div:nth-child(3) > div > span > button:nth-child(2)",
        );
    }

    groups! {
        project_list_projects: Selector::css(QUICK_SEARCH_ROW);
    }

    /// GUID of the project at 1-based position `n`
    pub async fn nth_project_guid(&self, n: usize) -> ProbeResult<String> {
        let selector = Selector::dynamic(Strategy::Css, format!("{QUICK_SEARCH_ROW}:nth-child({n})"))
            .with_wait(Wait::Quick);
        let href = match self.session().element(selector).attribute("href").await {
            Ok(href) => href,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        href.as_deref()
            .map(|href| href.trim_end_matches('/'))
            .and_then(|href| href.rsplit('/').next())
            .filter(|guid| !guid.is_empty())
            .map(str::to_string)
            .ok_or(ProbeError::ProjectNotFound { position: n })
    }

    /// Number of listed projects once quick search has rendered
    pub async fn list_length(&self) -> ProbeResult<usize> {
        self.project_list_projects().len().await
    }
}

component! {
    /// Ember dashboard project list
    EmberProjectList
}

impl EmberProjectList {
    elements! {
        search_input: Selector::css(".__35060.Application__page > div.quickSearch input");
        top_project_link: Selector::class_name("DashboardItem");
        /// Placeholder rows shown while the list loads
        loading_dashboard_item: Selector::class_name("loading-dashboard-item").with_wait(Wait::Quick);
    }

    groups! {
        project_list_projects: Selector::css(".__3eb7f > a");
    }

    async fn wait_loaded(&self) -> ProbeResult<()> {
        if self.loading_dashboard_item().here_then_gone().await? {
            return Ok(());
        }
        Err(ProbeError::StillLoading {
            what: "Dashboard page".to_string(),
        })
    }

    /// Link of the project at 1-based position `n`
    pub async fn nth_project_link(&self, n: usize) -> ProbeResult<String> {
        self.wait_loaded().await?;
        let member = match n.checked_sub(1) {
            Some(index) => self.project_list_projects().nth(index).await?,
            None => None,
        };
        let Some(member) = member else {
            return Err(ProbeError::ProjectNotFound { position: n });
        };
        member
            .attribute("href")
            .await?
            .ok_or(ProbeError::ProjectNotFound { position: n })
    }

    /// Number of listed projects once loading finished
    pub async fn list_length(&self) -> ProbeResult<usize> {
        self.wait_loaded().await?;
        self.project_list_projects().len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::mock::{MockDriver, MockElement};
    use crate::session::Session;
    use std::sync::Arc;
    use std::time::Duration;

    const LOADING: Selector = Selector::class_name("loading-dashboard-item");
    const EMBER_ROW: Selector = Selector::css(".__3eb7f > a");

    fn session(driver: &Arc<MockDriver>) -> Session {
        Session::new(driver.clone(), Settings::default())
    }

    mod logo_tests {
        use super::*;

        fn modal_with_logo(opacity: &'static str) -> Arc<MockDriver> {
            let driver = Arc::new(MockDriver::new());
            driver.with_dom(|dom| {
                dom.add(MockElement::new(Selector::id("addProjectFromHome")).key("modal"));
                dom.add(
                    MockElement::new(Selector::name("Center For Open Science"))
                        .css("opacity", opacity)
                        .child_of("modal"),
                );
            });
            driver
        }

        #[tokio::test(start_paused = true)]
        async fn test_selected_logo() {
            let driver = modal_with_logo("1");
            let session = session(&driver);
            let modal = CreateProjectModal::new(&session);
            assert!(modal
                .institution_selected("Center For Open Science")
                .await
                .unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_dimmed_logo() {
            let driver = modal_with_logo("0.25");
            let session = session(&driver);
            let modal = CreateProjectModal::new(&session);
            assert!(!modal
                .institution_selected("Center For Open Science")
                .await
                .unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_logo_is_domain_error() {
            let driver = modal_with_logo("1");
            let session = session(&driver);
            let modal = CreateProjectModal::new(&session);
            let err = modal.institution_selected("Nowhere U").await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "Institution logo for Nowhere U not present in modal"
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_title_input_scoped_to_modal() {
            let driver = modal_with_logo("1");
            driver.with_dom(|dom| {
                dom.add(MockElement::new(TITLE_INPUT).property("value", "search"));
                dom.add(MockElement::new(TITLE_INPUT).child_of("modal"));
            });
            let session = session(&driver);
            let modal = CreateProjectModal::new(&session);
            modal.title_input().send_keys("Testselenium").await.unwrap();
            assert_eq!(
                modal.title_input().property("value").await.unwrap().as_deref(),
                Some("Testselenium")
            );
        }
    }

    mod list_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_nth_link_after_loading() {
            let driver = Arc::new(MockDriver::new());
            driver.with_dom(|dom| {
                dom.add(MockElement::new(LOADING).vanish_after(Duration::from_secs(2)));
                for guid in ["aaaaa", "bbbbb"] {
                    dom.add(
                        MockElement::new(EMBER_ROW)
                            .href(format!("https://staging.osf.io/{guid}/"))
                            .appear_after(Duration::from_secs(2)),
                    );
                }
            });
            let session = session(&driver);
            let list = EmberProjectList::new(&session);
            assert_eq!(
                list.nth_project_link(2).await.unwrap(),
                "https://staging.osf.io/bbbbb/"
            );
            assert_eq!(list.list_length().await.unwrap(), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn test_position_out_of_range() {
            let driver = Arc::new(MockDriver::new());
            driver.with_dom(|dom| {
                dom.add(MockElement::new(EMBER_ROW).href("https://staging.osf.io/aaaaa/"));
            });
            let session = session(&driver);
            let list = EmberProjectList::new(&session);
            for n in [0, 3] {
                assert!(matches!(
                    list.nth_project_link(n).await,
                    Err(ProbeError::ProjectNotFound { position }) if position == n
                ));
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_still_loading() {
            let driver = Arc::new(MockDriver::new());
            driver.with_dom(|dom| {
                dom.add(MockElement::new(LOADING));
            });
            let session = session(&driver);
            let err = EmberProjectList::new(&session).list_length().await.unwrap_err();
            assert_eq!(err.to_string(), "Dashboard page is still loading");
        }

        #[tokio::test(start_paused = true)]
        async fn test_legacy_guid() {
            let driver = Arc::new(MockDriver::new());
            driver.with_dom(|dom| {
                dom.add(
                    MockElement::new(Selector::css(
                        "div.quick-search-table > div:nth-child(3) > a:nth-child(1)",
                    ))
                    .href("https://staging.osf.io/x7k2p/"),
                );
            });
            let session = session(&driver);
            let list = ProjectList::new(&session);
            assert_eq!(list.nth_project_guid(1).await.unwrap(), "x7k2p");
            assert!(matches!(
                list.nth_project_guid(2).await,
                Err(ProbeError::ProjectNotFound { position: 2 })
            ));
        }
    }
}
