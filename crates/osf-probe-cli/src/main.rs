//! osfprobe: run OSF end-to-end scenarios
//!
//! ## Usage
//!
//! ```bash
//! osfprobe run                               # Every scenario
//! osfprobe run --filter login::institution   # Scenarios containing the text
//! osfprobe list                              # Names and markers
//! osfprobe config --format json              # Resolved settings
//! ```

use clap::Parser;
use osf_probe::{capabilities_table, Registry};
use osf_probe_cli::{
    render_capabilities, render_report_json, render_scenario_list, render_settings, Cli,
    CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs, ListArgs, OutputFormat,
    RunArgs, ScenarioRunner, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match cli.command {
        Commands::Run(args) => run_scenarios(config, &args),
        Commands::List(args) => run_list(&config, &args),
        Commands::Config(args) => run_config(&config, &args),
        Commands::Caps => {
            print!("{}", render_capabilities(&capabilities_table()));
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_settings_file(cli.config.clone())
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .init();
}

fn run_scenarios(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let settings = config.settings()?;
    let format: OutputFormat = args.format.into();
    // JSON goes to stdout; keep the terminal chatter off it
    let config = match format {
        OutputFormat::Json => config.with_verbosity(Verbosity::Quiet),
        OutputFormat::Text => config,
    }
    .with_fail_fast(args.fail_fast);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("Failed to create runtime: {e}")))?;

    let report = rt.block_on(async {
        let driver = launch(&settings).await?;
        let mut runner = ScenarioRunner::new(config);
        runner.run(driver, settings, args.filter.as_deref()).await
    })?;

    if format == OutputFormat::Json {
        println!("{}", render_report_json(&report)?);
    }
    ScenarioRunner::check(&report)
}

#[cfg(feature = "browser")]
async fn launch(settings: &osf_probe::Settings) -> CliResult<osf_probe::SharedDriver> {
    let driver = osf_probe::ChromiumDriver::launch(settings).await?;
    Ok(std::sync::Arc::new(driver))
}

#[cfg(not(feature = "browser"))]
async fn launch(_settings: &osf_probe::Settings) -> CliResult<osf_probe::SharedDriver> {
    Err(CliError::config(
        "Browser support not enabled. Rebuild with --features browser",
    ))
}

fn run_list(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let settings = config.settings()?;
    let registry = Registry::all();
    let selected = registry.select(args.filter.as_deref(), &settings);
    print!("{}", render_scenario_list(&selected));
    if config.verbosity.is_verbose() {
        eprintln!("{} of {} scenarios", selected.len(), registry.scenarios().len());
    }
    Ok(())
}

fn run_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    let settings = config.settings()?;
    print!("{}", render_settings(&settings, args.format.into())?);
    Ok(())
}
