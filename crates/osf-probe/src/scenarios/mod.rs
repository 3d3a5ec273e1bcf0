//! Registered end-to-end scenarios.
//!
//! A [`Scenario`] is a named async function over a [`Session`] plus the
//! markers that decide where it may run. [`Registry`] holds every suite and
//! selects what a run executes; [`run_sequential`] drives the selection one
//! scenario at a time, signing out between them.

/// Build a `Vec<Scenario>` from `name [markers] => async fn` rows
macro_rules! register {
    ($($name:literal [$($marker:ident),*] => $run:path,)*) => {
        vec![$(
            $crate::scenarios::Scenario::new(
                $name,
                &[$($crate::scenarios::Marker::$marker),*],
                |session| ::futures::FutureExt::boxed($run(session)),
            ),
        )*]
    };
}

pub(crate) use register;

pub mod dashboard;
pub mod login;
pub mod meetings;

use crate::config::Settings;
use crate::result::ProbeResult;
use crate::session::Session;
use crate::workflows;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Future returned by a scenario body
pub type ScenarioFuture<'a> = BoxFuture<'a, ProbeResult<()>>;

/// Scenario body
pub type ScenarioFn = for<'a> fn(&'a Session) -> ScenarioFuture<'a>;

/// Where a scenario may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Quick check that the deployment is alive
    Smoke,
    /// Exercises a feature users depend on
    CoreFunctionality,
    /// Mutates data or needs fixture accounts that production lacks
    DontRunOnProd,
}

impl Marker {
    /// Marker name as shown in listings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::CoreFunctionality => "core_functionality",
            Self::DontRunOnProd => "dont_run_on_prod",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named journey through the application
#[derive(Clone, Copy)]
pub struct Scenario {
    /// `suite::group::case`
    pub name: &'static str,
    /// Run restrictions
    pub markers: &'static [Marker],
    run: ScenarioFn,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Declare a scenario
    #[must_use]
    pub const fn new(name: &'static str, markers: &'static [Marker], run: ScenarioFn) -> Self {
        Self { name, markers, run }
    }

    /// Whether the scenario carries `marker`
    #[must_use]
    pub fn has(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    /// Run the body and time it
    pub async fn execute(&self, session: &Session) -> ScenarioOutcome {
        let start = Instant::now();
        tracing::info!(scenario = self.name, "start");
        let outcome = match (self.run)(session).await {
            Ok(()) => ScenarioOutcome::pass(self.name),
            Err(e) => {
                tracing::warn!(scenario = self.name, error = %e, "failed");
                ScenarioOutcome::fail(self.name, e.to_string())
            }
        };
        outcome.with_duration(start.elapsed())
    }
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Whether it passed
    pub passed: bool,
    /// Failure message
    pub error: Option<String>,
    /// Wall time
    #[serde(with = "millis")]
    pub duration: Duration,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Outcomes of a run, in execution order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Individual outcomes
    pub outcomes: Vec<ScenarioOutcome>,
    /// Total wall time
    #[serde(with = "millis")]
    pub duration: Duration,
}

impl RunReport {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    /// Total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Failed outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed).collect()
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Every registered scenario
#[derive(Debug, Clone)]
pub struct Registry {
    scenarios: Vec<Scenario>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::all()
    }
}

impl Registry {
    /// Login, meetings and dashboard suites
    #[must_use]
    pub fn all() -> Self {
        let mut scenarios = login::scenarios();
        scenarios.extend(meetings::scenarios());
        scenarios.extend(dashboard::scenarios());
        Self { scenarios }
    }

    /// Registry over an explicit list
    #[must_use]
    pub const fn from_scenarios(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Registered scenarios, in registration order
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Scenario by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Scenarios whose name contains `filter`, minus `dont_run_on_prod`
    /// scenarios when `settings` point at production
    #[must_use]
    pub fn select(&self, filter: Option<&str>, settings: &Settings) -> Vec<&Scenario> {
        let production = settings.is_production();
        self.scenarios
            .iter()
            .filter(|s| filter.map_or(true, |f| s.name.contains(f)))
            .filter(|s| !(production && s.has(Marker::DontRunOnProd)))
            .collect()
    }
}

/// Run `scenarios` one after another on `session`
///
/// Each scenario is followed by a CAS logout so the next one starts signed
/// out. `observe` sees every outcome as it lands. With `fail_fast` the run
/// stops after the first failure.
pub async fn run_sequential<F>(
    session: &Session,
    scenarios: &[&Scenario],
    fail_fast: bool,
    mut observe: F,
) -> RunReport
where
    F: FnMut(&ScenarioOutcome),
{
    let start = Instant::now();
    let mut outcomes = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let outcome = scenario.execute(session).await;
        if let Err(e) = workflows::logout(session).await {
            tracing::warn!(scenario = scenario.name, error = %e, "logout after scenario failed");
        }
        observe(&outcome);
        let failed = !outcome.passed;
        outcomes.push(outcome);
        if failed && fail_fast {
            break;
        }
    }
    RunReport {
        outcomes,
        duration: start.elapsed(),
    }
}
