//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `DEVKIT_<SECTION>__<KEY>`, for example
//!    `DEVKIT_SCAFFOLD__TEMPLATE_REPOSITORY`
//! 3. Config file: `--config <FILE>` (must exist) or the default location
//!    from [`AppConfig::config_path`] (optional)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use devkit_adapters::compression::DEFAULT_ENDPOINT;

use crate::error::{CliError, CliResult};

/// Upstream template repository.
pub const DEFAULT_TEMPLATE_REPOSITORY: &str = "https://github.com/BruceLan/prompt.git";

/// Environment variable holding the TinyPNG key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "TINYPNG_API_KEY";

const ENV_PREFIX: &str = "DEVKIT";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `create-project` settings.
    pub scaffold: ScaffoldConfig,
    /// `resize-and-crop --tinypng` settings.
    pub compression: CompressionConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub template_repository: String,
    /// Executable used for `git clone`.
    pub git_program: PathBuf,
    /// Shallow clone depth; full clone when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_depth: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout; no timeout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            template_repository: DEFAULT_TEMPLATE_REPOSITORY.into(),
            git_program: PathBuf::from("git"),
            clone_depth: None,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl CompressionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then `DEVKIT_*`
    /// environment variables.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the default location is read if present.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let (file, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %file.display(), required, "Loading configuration");

        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(file.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.devkit.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "devkit", "devkit")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".devkit.toml"))
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
