//! `resize-and-crop`: scale and center-crop a directory of screenshots.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! |  0   | Success, help requested, or no images found              |
//! |  1   | Bad arguments, missing input directory or API key, setup |
//!
//! Files that fail individually are reported and do not change the code.

use std::process::ExitCode;

use clap::{CommandFactory, Parser, error::ErrorKind};
use tracing::debug;

use devkit_cli::{
    cli::ResizeCli, commands, config::AppConfig, logging::init_logging, output::OutputManager,
    report_error,
};

fn main() -> ExitCode {
    // Missing .env is fine; TINYPNG_API_KEY may come from the environment.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    // A bare invocation prints usage even when `NO_COLOR` supplies a value.
    if std::env::args_os().len() <= 1 {
        let _ = ResizeCli::command().print_help();
        return ExitCode::SUCCESS;
    }
    let cli = match ResizeCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return exit_on_parse_error(e),
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }
    debug!(
        verbose = cli.global.verbose,
        tinypng = cli.tinypng,
        "resize-and-crop started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            report_error(&e, &cli.global);
            return ExitCode::FAILURE;
        }
    };

    // ── 4. Output + dispatch ──────────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let global = cli.global.clone();
    match commands::resize_and_crop::execute(cli, config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, &global);
            ExitCode::FAILURE
        }
    }
}

/// Usage requests (including a bare invocation) go to stdout with code 0;
/// anything else is an argument error with code 1.
fn exit_on_parse_error(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            print!("{}", e.render());
            ExitCode::SUCCESS
        }
        _ => {
            let _ = e.print();
            ExitCode::FAILURE
        }
    }
}
