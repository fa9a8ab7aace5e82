//! Runtime configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::evaluator::{MatchOptions, DEFAULT_SIZE_LIMIT};

/// Top-level shortmatch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortmatchConfig {
    /// Max concurrent gradings in a batch.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Cap on a compiled pattern's size, in bytes.
    #[serde(default = "default_size_limit")]
    pub pattern_size_limit: usize,
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_size_limit() -> usize {
    DEFAULT_SIZE_LIMIT
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./shortmatch-results")
}

impl Default for ShortmatchConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            pattern_size_limit: default_size_limit(),
            output_dir: default_output_dir(),
        }
    }
}

impl ShortmatchConfig {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            size_limit: self.pattern_size_limit,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `shortmatch.toml` in the current directory
/// 2. `~/.config/shortmatch/config.toml`
///
/// Environment variable overrides: `SHORTMATCH_PARALLELISM`, `SHORTMATCH_OUTPUT_DIR`.
pub fn load_config() -> Result<ShortmatchConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ShortmatchConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("shortmatch.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ShortmatchConfig::default(),
    };

    if let Ok(value) = std::env::var("SHORTMATCH_PARALLELISM") {
        config.parallelism = value
            .trim()
            .parse()
            .with_context(|| format!("invalid SHORTMATCH_PARALLELISM: '{value}'"))?;
    }

    if let Ok(dir) = std::env::var("SHORTMATCH_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");

    Ok(config)
}

/// Parse config TOML text.
pub fn parse_config_str(content: &str) -> Result<ShortmatchConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("shortmatch"))
}
