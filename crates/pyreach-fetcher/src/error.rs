//! Error types for the Package Fetcher and Distribution Metadata Parser.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no configured index had {name}=={version}")]
    AllMirrorsFailed { name: String, version: String },

    #[error("package {name} has no release matching a supported archive extension")]
    NoCompatibleArchive { name: String },

    #[error("requested version {0} was not found and no default version is available")]
    VersionNotFound(String),

    #[error("unsupported archive extension: {0}")]
    UnsupportedExtension(String),

    #[error("archive entry {0:?} would escape the extraction root")]
    PathTraversal(PathBuf),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
