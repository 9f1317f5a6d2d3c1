//! rosterview CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use rosterview_core::{TracingConfig, TracingOutputFormat, init_tracing};

use rosterview_cli::cli::{Cli, Command, ConfigAction};
use rosterview_cli::commands;
use rosterview_cli::config::RosterConfig;
use rosterview_cli::error::CliResult;
use rosterview_cli::render::ReportKind;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::from_verbosity(cli.verbose);
    if cli.log_json {
        tracing_config = tracing_config.with_format(TracingOutputFormat::Json);
    }
    if let Some(ref filter) = cli.log_filter {
        tracing_config = tracing_config.with_env_filter(filter);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(RosterConfig::default_path);
    let config = match cli.config {
        Some(ref path) => RosterConfig::load_from(path)?,
        None => RosterConfig::load()?,
    };

    match cli.command {
        Command::Registrars(args) => {
            commands::report::run(ReportKind::Registrars, &args, &config).await
        }
        Command::Events(args) => commands::report::run(ReportKind::Events, &args, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
