//! Package-index configuration: pip.conf discovery and environment variables.

use crate::error::{ConfigError, Result};
use configparser::ini::Ini;
use std::path::PathBuf;

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

#[derive(Debug, Clone, Default)]
pub struct IndexUrlsConfig {
    /// Parse `$HOME/.pip/pip.conf` for `index-url`/`extra-index-url` entries.
    pub read_std_pip_conf: bool,
    /// Suppress appending the default PyPI index.
    pub disable_default_index_url: bool,
}

/// Extracts `index-url` and `extra-index-url` values from every section of a
/// pip-style INI file (not just `[global]`).
pub fn parse_pip_conf(path: &std::path::Path) -> Result<Vec<String>> {
    let mut ini = Ini::new();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::PipConf {
        path: path.to_path_buf(),
        source,
    })?;
    let map = ini
        .read(contents)
        .map_err(|e| ConfigError::PipConf {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

    let mut urls = Vec::new();
    for (_section, kvs) in map {
        for key in ["index-url", "extra-index-url"] {
            if let Some(Some(value)) = kvs.get(key) {
                urls.push(value.trim().to_string());
            }
        }
    }
    Ok(urls)
}

/// Returns `$HOME/.pip/pip.conf` if it exists.
pub fn default_pip_conf_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let path = home.join(".pip").join("pip.conf");
    path.exists().then_some(path)
}

/// Resolves the final ordered list of index base URLs, per §6/§10.2 of the spec.
pub fn resolve_index_urls(cfg: &IndexUrlsConfig) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    if cfg.read_std_pip_conf {
        if let Some(path) = default_pip_conf_path() {
            urls.extend(parse_pip_conf(&path)?);
        }
    }

    if !cfg.disable_default_index_url {
        urls.push(DEFAULT_INDEX_URL.to_string());
    }

    if urls.is_empty() {
        return Err(ConfigError::NoIndexUrls);
    }

    Ok(urls)
}

/// `GITHUB_TOKEN` env var, consumed by the (future) GitHub-org seed mode of the scanner.
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty())
}

/// Whether `VET_GITHUB_DISABLE_RATE_LIMIT_BLOCKING` is truthy.
pub fn github_rate_limit_blocking_disabled() -> bool {
    std::env::var("VET_GITHUB_DISABLE_RATE_LIMIT_BLOCKING")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
