//! Asistencia CLI - RUT check-in and validation tools.

use anyhow::Context;
use asistencia_cli::commands;
use asistencia_cli::repl;
use asistencia_cli::{Cli, Command, Config, Formatter};
use asistencia_gatekeeper::{Gatekeeper, IntakeConfig};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Run the CLI, returning the process exit code.
fn run() -> anyhow::Result<i32> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config: an explicit path must exist, the default one may not
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = if cli.config.is_some() {
        Config::load_from(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable config: {}", e);
            Config::default()
        })
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    let ok = match cli.command {
        None => {
            let gatekeeper = Gatekeeper::new(config.intake.clone())?;
            repl::run_checkin(&gatekeeper, &config, &formatter)?;
            true
        }
        Some(Command::Checkin(args)) => {
            let intake: IntakeConfig = args.rules.map(Into::into).unwrap_or_else(|| config.intake.clone());
            let gatekeeper = Gatekeeper::new(intake)?;
            repl::run_checkin(&gatekeeper, &config, &formatter)?;
            true
        }
        Some(Command::Clean(args)) => {
            commands::execute_clean(args)?;
            true
        }
        Some(Command::Format(args)) => {
            commands::execute_format(args)?;
            true
        }
        Some(Command::Validate(args)) => commands::execute_validate(args, &formatter)?,
        Some(Command::CheckDigit(args)) => {
            commands::execute_check_digit(args)?;
            true
        }
        Some(Command::Inspect(args)) => {
            commands::execute_inspect(args, &formatter)?;
            true
        }
        Some(Command::Import(args)) => {
            let file = args.file.clone();
            let report = commands::execute_import(args, &config, &formatter)
                .with_context(|| format!("Import of {} failed", file.display()))?;
            report.rejected.is_empty()
        }
        Some(Command::Extract(args)) => commands::execute_extract(args, &formatter)?,
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
            true
        }
    };

    Ok(if ok { 0 } else { 1 })
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
