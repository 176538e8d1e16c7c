use anyhow::{Context, Result};
use pyreach_core::config::{resolve_index_urls, IndexUrlsConfig};
use pyreach_engine::CrawlConfig;
use pyreach_graph::propagate::propagate;
use pyreach_graph::reduce::{reduce, ReductionPolicy};
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub async fn handle_scan(
    directory: String,
    max_depth: u32,
    graphviz: Option<String>,
    csv: Option<String>,
    read_std_conf: bool,
) -> Result<()> {
    let project_dir = Path::new(&directory);

    let index_cfg = IndexUrlsConfig { read_std_pip_conf: read_std_conf, disable_default_index_url: false };
    let index_urls = resolve_index_urls(&index_cfg).context("failed to resolve package index URLs")?;

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, finishing in-flight work and returning the partial graph");
            cancel_for_signal.cancel();
        }
    });

    let config = CrawlConfig { max_depth, index_urls };
    tracing::info!("crawling {directory}");
    let mut graph = pyreach_engine::crawl(project_dir, &config, cancel)
        .await
        .context("manifest scan failed")?;

    // Reduce before propagating either copy: `reduce` clones the graph as it
    // stood at crawl time, so each copy's vuln/hygiene index is populated from
    // scratch by its own `propagate` call rather than carrying over entries
    // for vertices the other copy has since pruned.
    let mut reduced = reduce(&graph, ReductionPolicy::default());
    propagate(&mut graph);
    propagate(&mut reduced);

    pyreach_reports::print_reports(&reduced, &graph);

    if let Some(path) = graphviz {
        pyreach_reports::export_dot(&reduced, Path::new(&path)).context("failed to write DOT export")?;
        println!("wrote {path}");
    }

    if let Some(path) = csv {
        pyreach_reports::export_csv(&reduced, Path::new(&path)).context("failed to write CSV export")?;
        println!("wrote {path} and {path}.metadata.csv");
    }

    Ok(())
}
