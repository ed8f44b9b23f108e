//! # devkit CLI
//!
//! Shared plumbing for the `create-project` and `resize-and-crop` binaries:
//! argument definitions, configuration, logging, output and error mapping.
//!
//! ## Startup sequence (both binaries)
//!
//! 1. Load `.env`.
//! 2. Parse CLI arguments.
//! 3. Initialise the tracing subscriber (logging).
//! 4. Load configuration (defaults + file + env).
//! 5. Build the [`output::OutputManager`].
//! 6. Run the command handler.
//! 7. Translate any [`error::CliError`] into a user-facing message and exit code.

use std::io::IsTerminal;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

/// Print `err` to stderr after logging it.
///
/// Colour is used only when stderr is a terminal and colour is not disabled.
pub fn report_error(err: &error::CliError, global: &cli::GlobalArgs) {
    err.log();

    let verbose = global.verbose > 0;
    let msg = if !global.no_color && std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");
}
