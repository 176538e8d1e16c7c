//! Manifest Scanner: `scan(input) -> report of {packages: [{details, manifest_ref,
//! insights?}]}`.
//!
//! Locates a supported manifest (priority: `poetry.lock`, `Pipfile.lock`,
//! `requirements.txt`, `pyproject.toml`; only the first found is scanned),
//! parses it into a flat package list, and enriches each entry concurrently
//! (bounded concurrency = 3) via the Insights Enricher.

pub mod error;
pub mod parsers;

use error::{Result, ScanError};
use futures::stream::{self, StreamExt};
use pyreach_core::models::{Manifest, PackageDetails, PkgVuln, Scorecard, ECOSYSTEM_PYPI};
use pyreach_insights::InsightsClient;
use std::path::Path;
use std::time::Duration;

const ENRICHMENT_CONCURRENCY: usize = 3;

/// Secondary-rate-limit wait applied before each scan, mirroring how a
/// GitHub-aware client would back off before its calls. Skipped when
/// `VET_GITHUB_DISABLE_RATE_LIMIT_BLOCKING` is set.
const GITHUB_RATE_LIMIT_WAIT: Duration = Duration::from_millis(200);

async fn github_rate_limit_wait() {
    if !pyreach_core::config::github_rate_limit_blocking_disabled() {
        tokio::time::sleep(GITHUB_RATE_LIMIT_WAIT).await;
    }
}

pub struct ScannedPackage {
    pub details: PackageDetails,
    pub manifest: Manifest,
    pub insights: Option<(Vec<PkgVuln>, Option<Scorecard>)>,
}

pub struct ScanReport {
    pub packages: Vec<ScannedPackage>,
}

/// Scans `project_dir` and returns the seed package set, each entry enriched
/// with vulnerabilities and a scorecard where the lookup succeeded.
pub async fn scan(project_dir: &Path, insights: &InsightsClient) -> Result<ScanReport> {
    github_rate_limit_wait().await;

    let (kind, manifest_path) = parsers::locate_manifest(project_dir)
        .ok_or_else(|| ScanError::NoManifestFound(project_dir.to_path_buf()))?;

    let details_list = parsers::parse_manifest(kind, &manifest_path)?;
    let manifest = Manifest {
        path: manifest_path.display().to_string(),
        display_path: manifest_path
            .strip_prefix(project_dir)
            .unwrap_or(&manifest_path)
            .display()
            .to_string(),
        ecosystem: ECOSYSTEM_PYPI.to_string(),
    };

    let packages = stream::iter(details_list)
        .map(|details| {
            let manifest = manifest.clone();
            let insights = insights.clone();
            async move {
                let (vulns, scorecard) = insights.enrich(&details.name, &details.version, &details.ecosystem).await;
                ScannedPackage { details, manifest, insights: Some((vulns, scorecard)) }
            }
        })
        .buffer_unordered(ENRICHMENT_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

    Ok(ScanReport { packages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let insights = InsightsClient::new();
        let result = scan(dir.path(), &insights).await;
        assert!(matches!(result, Err(ScanError::NoManifestFound(_))));
    }

    #[tokio::test]
    async fn rate_limit_wait_is_skipped_when_disabled() {
        std::env::set_var("VET_GITHUB_DISABLE_RATE_LIMIT_BLOCKING", "true");
        let start = std::time::Instant::now();
        github_rate_limit_wait().await;
        std::env::remove_var("VET_GITHUB_DISABLE_RATE_LIMIT_BLOCKING");
        assert!(start.elapsed() < GITHUB_RATE_LIMIT_WAIT, "disabling the flag must skip the sleep");
    }
}
