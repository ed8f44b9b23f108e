//! `create-project`: scaffold a project from the platform template repository.
//!
//! ## Exit codes
//!
//! | Code | Meaning                             |
//! |------|-------------------------------------|
//! |  0   | Success (failed steps are reported) |
//! |  1   | Internal / system error             |
//! |  2   | User / argument error               |
//! |  3   | Resource not found                  |
//! |  4   | Configuration error                 |

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use tracing::debug;

use devkit_cli::{
    cli::ScaffoldCli, commands, config::AppConfig, logging::init_logging, output::OutputManager,
    report_error,
};

fn main() -> ExitCode {
    // Missing .env is fine; real deployments use the environment.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match ScaffoldCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(2);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }
    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        "create-project started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            report_error(&e, &cli.global);
            return ExitCode::from(e.exit_code());
        }
    };

    // ── 4. Output + dispatch ──────────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let global = cli.global.clone();
    match commands::create_project::execute(cli, config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, &global);
            ExitCode::from(e.exit_code())
        }
    }
}
