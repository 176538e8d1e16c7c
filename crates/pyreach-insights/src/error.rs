//! Error types for the Insights Enricher.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InsightsError>;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("osv.dev request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode osv.dev response: {0}")]
    Decode(serde_json::Error),
}
