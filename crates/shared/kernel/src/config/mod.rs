use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of environment overrides, e.g. `HERALD__LOG__LEVEL=debug`.
pub const ENV_PREFIX: &str = "HERALD";

const DEFAULT_CONFIG_FILE: &str = "herald";

/// Custom error type for config loading.
#[herald_derive::herald_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `arena.toml`). If no path is provided, it
///    defaults to `"herald"` in the current working directory, with the format taken from the
///    file extension.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with
///    `HERALD__`. Nested structures are accessed using double underscores (e.g.,
///    `HERALD__LOG__LEVEL` maps to `log.level`).
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load(path, true)
}

/// Like [`load_config`], but a missing file is not an error.
///
/// Environment overrides still apply, and fields absent from both sources
/// fall back to the serde defaults of `T`.
///
/// # Errors
/// Returns an error if an existing file is malformed or the merged values do
/// not deserialize into `T`.
pub fn load_optional_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load(path, false)
}

fn load<T>(path: Option<impl AsRef<Path>>, required: bool) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake),
        );

    if required || effective_path.exists() {
        info!("Loading config from {}", effective_path.display());
    } else {
        debug!("No config file at {}, using defaults", effective_path.display());
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
