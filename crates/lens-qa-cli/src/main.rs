//! Lens QA CLI - Dirty-lens detection for captured images.

use clap::Parser;
use lens_qa_core::ResponseMode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{check::CheckArgs, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Check(args)) => run_check(CheckArgs::with_config(args, &config)),
        Some(Commands::Score(ref args)) => {
            run_request(commands::request::run(args, ResponseMode::Score, &config))
        }
        Some(Commands::IsDirty(ref args)) => {
            run_request(commands::request::run(args, ResponseMode::IsDirty, &config))
        }
        None => {
            // Default behavior: run check with flattened args
            if cli.check.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_check(CheckArgs::with_config(cli.check, &config))
        }
    };

    exit_code.into()
}

fn run_check(args: CheckArgs) -> ExitCode {
    match commands::check::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}

fn run_request(result: anyhow::Result<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::Error
    })
}
