//! Error types for the Crawler. Per-vertex failures are recovered locally and
//! never surface here; only scanner-level and setup failures do.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("manifest scan failed: {0}")]
    Scan(#[from] pyreach_scanner::error::ScanError),
}
