//! Package Fetcher: `fetch(work_dir, name, version?) -> (metadata_blob, extracted_path)`.
//!
//! Consults a configured ordered list of PyPI-compatible index URLs, falling
//! through to the next on failure, downloads the preferred archive kind and
//! extracts it under a traversal-safe destination directory.

pub mod error;
pub mod extract;
pub mod http;
pub mod index;
pub mod metadata;

use error::Result;
use http::HttpClientTable;
use std::path::{Path, PathBuf};

pub struct PackageFetcher {
    http: HttpClientTable,
    index_urls: Vec<String>,
}

impl PackageFetcher {
    /// `index_urls` is the already-resolved ordered list from
    /// `pyreach_core::config::resolve_index_urls`.
    pub fn new(index_urls: Vec<String>) -> Self {
        Self { http: HttpClientTable::new(), index_urls }
    }

    pub async fn fetch(
        &self,
        work_dir: &Path,
        name: &str,
        version: Option<&str>,
    ) -> Result<(serde_json::Value, PathBuf)> {
        index::fetch(&self.http, &self.index_urls, work_dir, name, version).await
    }
}
