//! Error types for the Manifest Scanner.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no supported manifest found under {0:?}")]
    NoManifestFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse manifest: {0}")]
    Parse(String),
}
