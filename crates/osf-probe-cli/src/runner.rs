//! Scenario runner

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use osf_probe::scenarios::run_sequential;
use osf_probe::{Registry, RunReport, Session, Settings, SharedDriver};
use std::sync::Arc;

/// Runs registered scenarios on one browser session
#[derive(Debug)]
pub struct ScenarioRunner {
    config: CliConfig,
    registry: Registry,
    reporter: ProgressReporter,
}

impl ScenarioRunner {
    /// Create a runner over every registered scenario
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        Self::with_registry(config, Registry::all())
    }

    /// Create a runner over a specific registry
    #[must_use]
    pub fn with_registry(config: CliConfig, registry: Registry) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self {
            config,
            registry,
            reporter,
        }
    }

    /// Run the scenarios selected by `filter` on `driver`
    ///
    /// The driver is closed afterwards whatever the outcome. A run with
    /// failures still returns its report; [`check`](Self::check) turns it
    /// into an error.
    pub async fn run(
        &mut self,
        driver: SharedDriver,
        settings: Settings,
        filter: Option<&str>,
    ) -> CliResult<RunReport> {
        let settings = Arc::new(settings);
        let selected = self.registry.select(filter, &settings);
        let session = Session::with_shared(driver, Arc::clone(&settings));
        if selected.is_empty() {
            self.reporter.warning("No scenarios selected");
            Self::close(&session).await;
            return Ok(RunReport::default());
        }

        tracing::info!(
            count = selected.len(),
            domain = ?settings.domain,
            "running scenarios"
        );
        self.reporter.header("Running Scenarios");
        self.reporter
            .start_progress(selected.len() as u64, "Starting...");

        let reporter = &self.reporter;
        let report = run_sequential(&session, &selected, self.config.fail_fast, |outcome| {
            reporter.outcome(outcome);
            reporter.increment(1);
        })
        .await;
        self.reporter.finish();

        Self::close(&session).await;

        self.reporter.summary(
            report.passed_count(),
            report.failed_count(),
            report.duration,
        );
        Ok(report)
    }

    async fn close(session: &Session) {
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "closing browser failed");
        }
    }

    /// Error when any scenario failed
    pub fn check(report: &RunReport) -> CliResult<()> {
        if report.all_passed() {
            return Ok(());
        }
        Err(CliError::ScenariosFailed {
            failed: report.failed_count(),
            total: report.total(),
        })
    }
}
