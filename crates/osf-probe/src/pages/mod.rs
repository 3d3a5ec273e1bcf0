//! Page and component objects for the OSF web application.
//!
//! One module per page family. Selectors are declared inline as const data;
//! accessors re-resolve on every call.

pub mod collections;
pub mod dashboard;
pub mod landing;
pub mod login;
pub mod meetings;
pub mod navbars;
pub mod project;
pub mod registries;

pub use collections::{CollectionDiscoverPage, CollectionSubmitPage};
pub use dashboard::{
    CreateProjectModal, DashboardPage, EmberCreateProjectModal, EmberProjectCreatedModal,
    EmberProjectList, ProjectCreatedModal, ProjectList,
};
pub use landing::{ForgotPasswordPage, LandingPage, RegisterPage};
pub use login::{
    CASAuthorizationPage, CasFooter, GenericCASPage, InstitutionalLoginPage, Login2FAPage,
    LoginPage, LoginToSPage, UnsupportedInstitutionLoginPage,
};
pub use meetings::{MeetingDetailPage, MeetingsPage};
pub use navbars::{CollectionsNavbar, MeetingsNavbar, PrimaryDestination, RegistriesNavbar};
pub use project::{DeleteNodeDialog, NodeSettingsPage};
pub use registries::{
    DraftRegistrationMetadataPage, DraftRegistrationReviewPage, DraftRegistrationSummaryPage,
    RegistrationAddNewPage, RegistrationAnalyticsPage, RegistrationCommentsPage,
    RegistrationComponentsPage, RegistrationDetailPage, RegistrationFileDetailPage,
    RegistrationFilesListPage, RegistrationLinksPage, RegistrationMetadataPage,
    RegistrationResourcesPage, RegistrationTombstonePage, RegistrationWikiPage,
    RegistriesDiscoverPage, RegistriesLandingPage,
};
