//! Runner configuration: defaults, TOML file, environment, CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::AppError;

pub const DATA_DIR_ENV: &str = "RUNNER_DATADIR";
pub const K6_BINARY_ENV: &str = "RUNNER_K6_BINARY";
pub const DEFAULT_K6_BINARY: &str = "k6";

/// Resolved configuration handed to the runner at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Staging root for inline content and repository checkouts.
    pub data_dir: PathBuf,
    /// Program name or path of the k6 executable.
    pub k6_binary: String,
}

impl RunnerConfig {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self { data_dir: data_dir.into(), k6_binary: DEFAULT_K6_BINARY.to_string() }
    }

    pub fn with_k6_binary<S: Into<String>>(mut self, k6_binary: S) -> Self {
        self.k6_binary = k6_binary.into();
        self
    }
}

/// One partial configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub data_dir: Option<PathBuf>,
    pub k6_binary: Option<String>,
}

impl ConfigLayer {
    /// Values set in `other` replace values in `self`.
    fn overlay(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            data_dir: other.data_dir.or(self.data_dir),
            k6_binary: other.k6_binary.or(self.k6_binary),
        }
    }

    /// Layer read from `RUNNER_DATADIR` / `RUNNER_K6_BINARY`; empty values are ignored.
    pub fn from_env() -> ConfigLayer {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        ConfigLayer {
            data_dir: var(DATA_DIR_ENV).map(PathBuf::from),
            k6_binary: var(K6_BINARY_ENV),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunnerConfigDto {
    runner: Option<RunnerSectionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunnerSectionDto {
    data_dir: Option<PathBuf>,
    k6_binary: Option<String>,
}

/// Parse the `[runner]` table of a TOML config file.
pub fn parse_config_content(content: &str) -> Result<ConfigLayer, AppError> {
    let dto: RunnerConfigDto = toml::from_str(content)?;
    Ok(dto
        .runner
        .map(|r| ConfigLayer { data_dir: r.data_dir, k6_binary: r.k6_binary })
        .unwrap_or_default())
}

/// Merge layers (file < env < flags) and require a data directory.
pub fn resolve_config(
    file: ConfigLayer,
    env: ConfigLayer,
    flags: ConfigLayer,
) -> Result<RunnerConfig, AppError> {
    let merged = file.overlay(env).overlay(flags);
    let data_dir = merged.data_dir.ok_or_else(|| {
        AppError::config_error(format!(
            "No data directory configured. Set {} or pass --data-dir.",
            DATA_DIR_ENV
        ))
    })?;

    Ok(RunnerConfig {
        data_dir,
        k6_binary: merged.k6_binary.unwrap_or_else(|| DEFAULT_K6_BINARY.to_string()),
    })
}

/// Load configuration from an optional TOML file, the process environment and flags.
pub fn load_config(
    config_file: Option<&Path>,
    flags: ConfigLayer,
) -> Result<RunnerConfig, AppError> {
    let file = match config_file {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                AppError::config_error(format!("Failed to read config {}: {}", path.display(), e))
            })?;
            parse_config_content(&content)?
        }
        None => ConfigLayer::default(),
    };

    resolve_config(file, ConfigLayer::from_env(), flags)
}
