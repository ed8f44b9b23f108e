//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, help
//! text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use devkit_core::domain::Platform;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── create-project ────────────────────────────────────────────────────────────

/// Scaffold a new project from the platform template repository.
#[derive(Debug, Parser)]
#[command(
    name     = "create-project",
    bin_name = "create-project",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Create a project from the platform template repository",
    long_about = "Creates <DESTINATION>/<PROJECT_NAME>, copies the template's \
                  arch/<PLATFORM>/ tree into it, generates \
                  .cursor/rules/<PLATFORM>4dev.mdc from GEMINI.md and creates \
                  empty docs/ and audit/ directories.",
    after_help = "EXAMPLES:\n\
        \x20 create-project my-app ios\n\
        \x20 create-project shop flutter ~/work\n\
        \x20 create-project demo android --output-format json",
    arg_required_else_help = true,
)]
pub struct ScaffoldCli {
    /// Flags shared by both tools.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Name of the project directory to create.
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: String,

    /// Target platform; selects `arch/<platform>/` in the template.
    #[arg(value_name = "PLATFORM", value_enum)]
    pub platform: PlatformArg,

    /// Directory the project is created in.
    #[arg(value_name = "DESTINATION", default_value = ".")]
    pub destination: PathBuf,
}

/// Platforms accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Ios,
    Flutter,
    Android,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Flutter => Platform::Flutter,
            PlatformArg::Android => Platform::Android,
        }
    }
}

// ── resize-and-crop ───────────────────────────────────────────────────────────

/// Batch-resize screenshots to 1242x2688 with a centered crop.
#[derive(Debug, Parser)]
#[command(
    name     = "resize-and-crop",
    bin_name = "resize-and-crop",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scale and center-crop every PNG/JPEG in a directory to 1242x2688",
    long_about = "Every .png, .jpg and .jpeg file in <INPUT_DIR> is scaled so it \
                  covers 1242x2688, center-cropped to exactly that size and saved \
                  under the same name in <OUTPUT_DIR> (created if missing). With \
                  --tinypng the result is compressed through the TinyPNG API; if \
                  compression fails the uncompressed crop is saved instead.",
    after_help = "EXAMPLES:\n\
        \x20 resize-and-crop ./raw_images ./output_images\n\
        \x20 TINYPNG_API_KEY=... resize-and-crop ./raw ./out --tinypng",
    arg_required_else_help = true,
)]
pub struct ResizeCli {
    /// Flags shared by both tools.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Directory containing the source images.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory the processed images are written to.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Compress each result with TinyPNG (requires the API key variable).
    #[arg(long = "tinypng", help = "Compress results with the TinyPNG API")]
    pub tinypng: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn scaffold_cli_structure_is_valid() {
        ScaffoldCli::command().debug_assert();
    }

    #[test]
    fn resize_cli_structure_is_valid() {
        ResizeCli::command().debug_assert();
    }

    #[test]
    fn destination_defaults_to_current_dir() {
        let cli = ScaffoldCli::try_parse_from(["create-project", "app", "ios"]).unwrap();
        assert_eq!(cli.project_name, "app");
        assert_eq!(Platform::from(cli.platform), Platform::Ios);
        assert_eq!(cli.destination, PathBuf::from("."));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let err = ScaffoldCli::try_parse_from(["create-project", "app", "windows"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn platform_is_case_sensitive() {
        assert!(ScaffoldCli::try_parse_from(["create-project", "app", "IOS"]).is_err());
    }

    #[test]
    fn resize_flags_parse() {
        let cli =
            ResizeCli::try_parse_from(["resize-and-crop", "in", "out", "--tinypng", "-vv"]).unwrap();
        assert!(cli.tinypng);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.input_dir, PathBuf::from("in"));
    }

    #[test]
    fn resize_without_args_requests_help() {
        let err = ResizeCli::try_parse_from(["resize-and-crop"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn resize_with_one_arg_is_missing_argument() {
        let err = ResizeCli::try_parse_from(["resize-and-crop", "in"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
