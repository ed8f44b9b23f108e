//! Implementation of `resize-and-crop`.
//!
//! Checks the inputs and the compression credential up front, then hands the
//! batch to `TransformService` and prints one line per file as it finishes.

use std::io;

use tracing::{debug, info, instrument};

use devkit_adapters::{ImageRsCodec, LocalFilesystem, TinyPngClient};
use devkit_core::application::{
    BatchReport, CompressionOutcome, FileOutcome, FileStatus, TransformService,
};

use crate::{
    cli::ResizeCli,
    config::{AppConfig, CompressionConfig},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute `resize-and-crop`.
///
/// Fails before touching any file when the input directory is missing or
/// `--tinypng` is given without a key. Per-file failures are printed and do
/// not change the outcome.
#[instrument(skip_all, fields(input = %args.input_dir.display(), tinypng = args.tinypng))]
pub fn execute(args: ResizeCli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.input_dir.is_dir() {
        return Err(CliError::InputDirMissing {
            path: args.input_dir,
        });
    }

    let mut service = TransformService::new(ImageRsCodec::new(), Box::new(LocalFilesystem::new()));
    if args.tinypng {
        let client = build_compressor(&config.compression)?;
        debug!(endpoint = client.endpoint(), "Compression enabled");
        service = service.with_compressor(Box::new(client));
    }

    let inputs = service
        .collect_inputs(&args.input_dir)
        .with_cli_context(|| "listing input directory")?;
    if !inputs.is_empty() {
        let compression = if service.compresses() {
            " and compressing with TinyPNG"
        } else {
            ""
        };
        output.header(&format!(
            "Found {} image(s), resizing to {}{compression}...",
            inputs.len(),
            service.target()
        ))?;
    }

    let bar = output.progress_bar(inputs.len() as u64);
    let mut write_error: Option<io::Error> = None;
    let report = service
        .run_batch(&args.input_dir, &args.output_dir, |outcome| {
            if let Err(e) = bar.suspend(|| print_outcome(outcome, &output)) {
                write_error.get_or_insert(e);
            }
            bar.inc(1);
        })
        .with_cli_context(|| "processing batch")?;
    bar.finish_and_clear();
    if let Some(e) = write_error {
        return Err(e.into());
    }

    print_summary(&report, &output)?;
    output.report(&report)?;

    info!(
        saved = report.saved(),
        failed = report.failed(),
        "resize-and-crop finished"
    );
    Ok(())
}

/// Read the API key from the configured variable and build the client.
fn build_compressor(config: &CompressionConfig) -> CliResult<TinyPngClient> {
    let key = std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| CliError::MissingCredential {
            variable: config.api_key_env.clone(),
        })?;

    TinyPngClient::new(&config.endpoint, key, config.timeout())
        .map_err(|source| CliError::CompressionSetup { source })
}

fn print_outcome(outcome: &FileOutcome, output: &OutputManager) -> io::Result<()> {
    let position = format!("[{}/{}]", outcome.index, outcome.total);
    match &outcome.status {
        FileStatus::Saved { compression, .. } => match compression {
            CompressionOutcome::Disabled => {
                output.success(&format!("{position} processed: {}", outcome.name))
            }
            CompressionOutcome::Compressed {
                original_bytes,
                compressed_bytes,
            } => {
                let reduction = compression.reduction_percent().unwrap_or(0.0);
                output.success(&format!(
                    "{position} processed: {} (compressed {original_bytes} -> {compressed_bytes} bytes, {reduction:.1}% smaller)",
                    outcome.name
                ))
            }
            CompressionOutcome::FellBack { reason } => {
                output.warning(&format!(
                    "{position} compression failed for {}: {reason}",
                    outcome.name
                ))?;
                output.success(&format!(
                    "{position} processed: {} (saved uncompressed)",
                    outcome.name
                ))
            }
        },
        FileStatus::Failed { reason } => output.error(&format!(
            "{position} failed: {}, reason: {reason}",
            outcome.name
        )),
    }
}

fn print_summary(report: &BatchReport, output: &OutputManager) -> io::Result<()> {
    if report.is_empty() {
        return output.info(&format!(
            "No image files found in input directory: {}",
            report.input_dir.display()
        ));
    }

    output.print("")?;
    let line = format!(
        "All done: {} saved, {} failed. Output directory: {}",
        report.saved(),
        report.failed(),
        report.output_dir.display()
    );
    if report.failed() == 0 {
        output.success(&line)
    } else {
        output.warning(&line)
    }
}
