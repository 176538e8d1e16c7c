use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge endpoint missing during propagation: {0}")]
    MissingEdge(String),

    #[error("no path from root to vertex {0}")]
    NoPathFromRoot(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
