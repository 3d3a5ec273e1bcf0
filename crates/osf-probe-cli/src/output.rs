//! Output formatting and progress reporting

use crate::error::CliResult;
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use osf_probe::{Capability, RunReport, Scenario, ScenarioOutcome, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Output format for structured documents (settings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// YAML
    #[default]
    Yaml,
    /// JSON
    Json,
}

/// Progress reporter for scenario execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, message: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(message),
            None => {
                let _ = self.term.write_line(message);
            }
        }
    }

    /// Print one scenario outcome
    pub fn outcome(&self, outcome: &ScenarioOutcome) {
        let elapsed = format!("({:.2}s)", outcome.duration.as_secs_f64());
        match outcome.error {
            None => self.success(&format!("{} {elapsed}", outcome.name)),
            Some(ref error) => self.failure(&format!("{} {elapsed}\n    {error}", outcome.name)),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print run summary
    pub fn summary(&self, passed: usize, failed: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");

        let total = passed + failed;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed)"
            ));
        }
    }
}

/// JSON document for a finished run
pub fn render_report_json(report: &RunReport) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One line per scenario: name and markers
#[must_use]
pub fn render_scenario_list(scenarios: &[&Scenario]) -> String {
    let mut out = String::new();
    for scenario in scenarios {
        let markers: Vec<&str> = scenario.markers.iter().map(|m| m.as_str()).collect();
        if markers.is_empty() {
            let _ = writeln!(out, "{}", scenario.name);
        } else {
            let _ = writeln!(out, "{} [{}]", scenario.name, markers.join(", "));
        }
    }
    out
}

/// Resolved settings with passwords redacted
pub fn render_settings(settings: &Settings, format: DocumentFormat) -> CliResult<String> {
    let redacted = settings.redacted();
    Ok(match format {
        DocumentFormat::Yaml => serde_yaml_ng::to_string(&redacted)?,
        DocumentFormat::Json => serde_json::to_string_pretty(&redacted)?,
    })
}

/// Capabilities table, one build per line
#[must_use]
pub fn render_capabilities(table: &BTreeMap<&'static str, Capability>) -> String {
    let mut out = String::new();
    for (build, cap) in table {
        let target = cap
            .browser
            .as_deref()
            .or(cap.device.as_deref())
            .unwrap_or_default();
        let os = cap.os.as_deref().unwrap_or("-");
        let resolution = cap.resolution.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{build:<8} {target:<18} {os:<8} {:<7} {resolution}",
            cap.os_version
        );
    }
    out
}
