//! Shared data model, configuration and error types used across every `pyreach` crate.

pub mod config;
pub mod error;
pub mod models;

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `~/.cache/pyreach`, created if it doesn't exist yet.
pub fn cache_dir() -> PathBuf {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pyreach");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

pub fn cache_subdir(name: &str) -> PathBuf {
    let dir = cache_dir().join(name);
    let _ = std::fs::create_dir_all(&dir);
    dir
}
