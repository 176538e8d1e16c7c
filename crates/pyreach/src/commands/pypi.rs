use anyhow::{Context, Result};
use pyreach_core::config::{resolve_index_urls, IndexUrlsConfig};
use pyreach_fetcher::PackageFetcher;
use std::path::Path;

pub async fn handle_pypi(dir: String, pkg: String, version: Option<String>) -> Result<()> {
    let index_urls = resolve_index_urls(&IndexUrlsConfig { read_std_pip_conf: false, disable_default_index_url: false })
        .context("failed to resolve package index URLs")?;
    let fetcher = PackageFetcher::new(index_urls);

    let work_dir = Path::new(&dir);
    std::fs::create_dir_all(work_dir).with_context(|| format!("failed to create {dir}"))?;

    let (_, extracted_path) = fetcher
        .fetch(work_dir, &pkg, version.as_deref())
        .await
        .with_context(|| format!("failed to fetch {pkg}"))?;

    println!("extracted to: {}", extracted_path.display());

    let deps = pyreach_fetcher::metadata::read_requires_dist(&extracted_path);
    println!("dependency specs ({}):", deps.len());
    for dep in deps {
        println!("  {} {}", dep.name, dep.version);
    }

    Ok(())
}
