//! CLI command definitions using clap

use crate::config::ColorChoice;
use crate::output::{DocumentFormat, OutputFormat};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// osfprobe: run OSF end-to-end scenarios in a browser
#[derive(Parser, Debug)]
#[command(name = "osfprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML settings file; environment variables override it
    #[arg(long, global = true, env = "OSF_PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios in a browser
    Run(RunArgs),

    /// List scenarios
    List(ListArgs),

    /// Show resolved settings (passwords redacted)
    Config(ConfigArgs),

    /// Show the browser capabilities table
    Caps,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Result format
    #[arg(long, default_value = "text")]
    pub format: RunFormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Document format
    #[arg(long, default_value = "yaml")]
    pub format: ConfigFormatArg,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Detect terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Run result format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum RunFormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

impl From<RunFormatArg> for OutputFormat {
    fn from(arg: RunFormatArg) -> Self {
        match arg {
            RunFormatArg::Text => Self::Text,
            RunFormatArg::Json => Self::Json,
        }
    }
}

/// Settings document format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ConfigFormatArg {
    /// YAML
    #[default]
    Yaml,
    /// JSON
    Json,
}

impl From<ConfigFormatArg> for DocumentFormat {
    fn from(arg: ConfigFormatArg) -> Self {
        match arg {
            ConfigFormatArg::Yaml => Self::Yaml,
            ConfigFormatArg::Json => Self::Json,
        }
    }
}
