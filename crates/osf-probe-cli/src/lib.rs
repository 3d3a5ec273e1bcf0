//! osfprobe CLI library
//!
//! Command-line front end for the osf-probe scenario suite.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ConfigFormatArg, ListArgs, RunArgs, RunFormatArg,
};
pub use config::{load_settings, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{
    render_capabilities, render_report_json, render_scenario_list, render_settings,
    DocumentFormat, OutputFormat, ProgressReporter,
};
pub use runner::ScenarioRunner;
