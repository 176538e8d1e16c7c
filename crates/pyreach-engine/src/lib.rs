//! Crawler: builds the Graph Store by expanding a Python project's seed
//! packages breadth-first, calling out to the Fetcher, Source Analyzer,
//! Insights Enricher and Distribution Metadata Parser along the way.

pub mod error;

use error::Result;
use petgraph::stable_graph::NodeIndex;
use pyreach_core::models::{Manifest, Package, PackageDetails, ECOSYSTEM_PYPI};
use pyreach_fetcher::PackageFetcher;
use pyreach_graph::Graph;
use pyreach_insights::InsightsClient;
use std::collections::HashSet;
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub struct CrawlConfig {
    pub max_depth: u32,
    pub index_urls: Vec<String>,
}

/// Crawls `project_dir`, returning the populated (unreduced) graph. Per-vertex
/// fetch/parse/enrichment failures are logged and skipped; the crawl
/// continues. A dropped `cancel` token returns the partial graph collected so
/// far rather than erroring.
pub async fn crawl(project_dir: &Path, config: &CrawlConfig, cancel: CancellationToken) -> Result<Graph> {
    let insights = InsightsClient::new();
    let fetcher = PackageFetcher::new(config.index_urls.clone());

    let mut graph = Graph::new();

    let root_name = project_dir.file_name().and_then(|n| n.to_str()).unwrap_or("root").to_string();
    let root_details = PackageDetails::new(root_name, "0.0.0", ECOSYSTEM_PYPI);
    let root_idx = graph.add_vertex(Package::new(root_details, None, 0)).index();
    graph.set_root(root_idx);

    let root_imports = pyreach_analyzer::imported_modules(project_dir).unwrap_or_else(|e| {
        tracing::debug!("root import analysis failed: {e}");
        Default::default()
    });
    let root_exports = pyreach_analyzer::exported_modules(project_dir).unwrap_or_else(|e| {
        tracing::debug!("root export analysis failed: {e}");
        Default::default()
    });
    if let Some(root) = graph.get_mut(root_idx) {
        root.add_imported_modules(root_imports);
        root.add_exported_modules(root_exports);
    }

    let mut queue: Vec<NodeIndex> = Vec::new();
    // Vertices already enriched by the scanner, so the expansion loop below
    // must not enrich them a second time (duplicate vuln records, wasted round-trip).
    let mut seeded: HashSet<NodeIndex> = HashSet::new();

    let seed_report = pyreach_scanner::scan(project_dir, &insights).await?;
    for seed in seed_report.packages {
        let manifest = Some(seed.manifest);
        let mut pkg = Package::new(seed.details, manifest, 1);
        if let Some((vulns, scorecard)) = seed.insights {
            pkg.add_vulnerabilities(vulns);
            pkg.add_scorecard(scorecard);
        }
        let outcome = graph.add_vertex(pkg);
        graph.add_edge(root_idx, outcome.index());
        seeded.insert(outcome.index());
        if outcome.is_new() {
            queue.push(outcome.index());
        }
    }

    let mut cursor = 0usize;
    while cursor < queue.len() {
        if cancel.is_cancelled() {
            tracing::info!("crawl cancelled with {} vertices expanded", cursor);
            break;
        }

        let idx = queue[cursor];
        cursor += 1;

        let Some(pkg) = graph.get(idx) else { continue };
        if pkg.depth > config.max_depth {
            continue;
        }
        let name = pkg.details.name.clone();
        let version = pkg.details.version.clone();
        let ecosystem = pkg.details.ecosystem.clone();
        let depth = pkg.depth;

        let Ok(work_dir) = tempfile::tempdir() else {
            tracing::debug!("failed to create work directory for {name}");
            continue;
        };

        let fetch_result = fetcher.fetch(work_dir.path(), &name, Some(&version)).await;
        let extracted_path = match fetch_result {
            Ok((_, path)) => path,
            Err(e) => {
                tracing::debug!("fetch failed for {name}@{version}: {e}");
                continue;
            }
        };

        let imports = pyreach_analyzer::imported_modules(&extracted_path).unwrap_or_default();
        let exports = pyreach_analyzer::exported_modules(&extracted_path).unwrap_or_default();
        // Seeds already carry vulns/scorecard from the scanner; re-enriching
        // here would duplicate them and re-issue the same network calls.
        let enrichment = if seeded.contains(&idx) { None } else { Some(insights.enrich(&name, &version, &ecosystem).await) };

        if let Some(pkg_mut) = graph.get_mut(idx) {
            pkg_mut.add_imported_modules(imports);
            pkg_mut.add_exported_modules(exports);
            if let Some((vulns, scorecard)) = enrichment {
                pkg_mut.add_vulnerabilities(vulns);
                pkg_mut.add_scorecard(scorecard);
            }
        }

        let deps = pyreach_fetcher::metadata::read_requires_dist(&extracted_path);
        for dep in deps {
            let manifest = Manifest {
                path: extracted_path.display().to_string(),
                display_path: format!("{name}@{version}/.dist-info/METADATA"),
                ecosystem: ECOSYSTEM_PYPI.to_string(),
            };
            let child = Package::new(dep, Some(manifest), depth + 1);
            let outcome = graph.add_vertex(child);
            graph.add_edge(idx, outcome.index());
            if outcome.is_new() {
                queue.push(outcome.index());
            }
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crawl_of_project_with_no_manifest_surfaces_scanner_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = CrawlConfig { max_depth: 3, index_urls: vec!["https://pypi.org/pypi".to_string()] };

        let result = crawl(dir.path(), &config, CancellationToken::new()).await;
        assert!(result.is_err(), "a top-level scanner failure must surface, not be swallowed");
    }
}
