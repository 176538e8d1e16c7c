//! Error types for the Reporter's graph exporters.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
}
