use thiserror::Error;

/// Fatal at startup: no usable index URLs, or the scanned directory cannot be resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no package index URLs configured (pip.conf disabled and default index disabled)")]
    NoIndexUrls,

    #[error("base directory {0:?} does not exist or is not a directory")]
    InvalidBaseDirectory(std::path::PathBuf),

    #[error("failed to read pip.conf at {path:?}: {source}")]
    PipConf {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
