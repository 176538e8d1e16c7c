//! PyPI JSON index client: resolves a package+version to a downloadable
//! archive across an ordered list of mirrors.

use crate::error::{FetchError, Result};
use crate::http::HttpClientTable;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const PREFERRED_EXTENSIONS: [&str; 4] = [".tar.gz", ".egg", ".whl", ".zip"];

#[derive(Debug, Deserialize)]
struct IndexResponse {
    info: InfoField,
    releases: std::collections::HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct InfoField {
    version: String,
}

#[derive(Debug, Deserialize, Clone)]
struct ReleaseFile {
    filename: String,
    url: String,
}

/// Downloads and extracts `name`@`version` (or the project's current release,
/// if `version` is empty or `"0.0.0"`) into `work_dir`, trying each configured
/// index URL in order until one succeeds.
///
/// Returns the raw index JSON body (as the "metadata_blob") and the path the
/// archive was extracted to.
pub async fn fetch(
    http: &HttpClientTable,
    index_urls: &[String],
    work_dir: &Path,
    name: &str,
    version: Option<&str>,
) -> Result<(serde_json::Value, PathBuf)> {
    let mut last_err = None;

    for index_url in index_urls {
        match fetch_from_mirror(http, index_url, work_dir, name, version).await {
            Ok(result) => return Ok(result),
            Err(e) => {
                tracing::debug!("mirror {index_url} failed for {name}: {e}");
                last_err = Some(e);
            }
        }
    }

    tracing::warn!("all mirrors failed for {name}: {:?}", last_err);
    Err(FetchError::AllMirrorsFailed { name: name.to_string(), version: version.unwrap_or_default().to_string() })
}

async fn fetch_from_mirror(
    http: &HttpClientTable,
    index_url: &str,
    work_dir: &Path,
    name: &str,
    version: Option<&str>,
) -> Result<(serde_json::Value, PathBuf)> {
    let (base_url, client, creds) = http.client_for(index_url).await;
    let url = format!("{}/{}/json", base_url.trim_end_matches('/'), name);

    let mut request = client.get(&url);
    if let Some((user, pass)) = &creds {
        request = request.basic_auth(user, Some(pass));
    }

    let response = request.send().await?.error_for_status()?;
    let blob: serde_json::Value = response.json().await?;
    let index: IndexResponse = serde_json::from_value(blob.clone())?;

    let resolved_version = select_version(version, &index)?;
    let files = index.releases.get(&resolved_version).ok_or_else(|| FetchError::NoCompatibleArchive { name: name.to_string() })?;
    let archive = select_archive(files).ok_or_else(|| FetchError::NoCompatibleArchive { name: name.to_string() })?;

    let archive_ext = PREFERRED_EXTENSIONS
        .iter()
        .find(|ext| archive.filename.ends_with(*ext))
        .copied()
        .unwrap_or("");
    let archive_path = work_dir.join(format!("{name}{archive_ext}"));

    download(&client, &creds, &archive.url, &archive_path).await?;

    let extracted_path = work_dir.join(name);
    crate::extract::extract_archive(&archive_path, &extracted_path)?;

    Ok((blob, extracted_path))
}

fn select_version(requested: Option<&str>, index: &IndexResponse) -> Result<String> {
    match requested {
        None | Some("") | Some("0.0.0") => Ok(index.info.version.clone()),
        Some(v) if index.releases.contains_key(v) => Ok(v.to_string()),
        Some(v) => index
            .releases
            .keys()
            .next()
            .cloned()
            .ok_or_else(|| FetchError::VersionNotFound(v.to_string())),
    }
}

fn select_archive(files: &[ReleaseFile]) -> Option<&ReleaseFile> {
    for ext in PREFERRED_EXTENSIONS {
        if let Some(found) = files.iter().find(|f| f.filename.ends_with(ext)) {
            return Some(found);
        }
    }
    None
}

async fn download(
    client: &reqwest::Client,
    creds: &Option<(String, String)>,
    url: &str,
    dest: &Path,
) -> Result<()> {
    let mut request = client.get(url);
    if let Some((user, pass)) = creds {
        request = request.basic_auth(user, Some(pass));
    }
    let bytes = request.send().await?.error_for_status()?.bytes().await?;
    tokio::fs::write(dest, &bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index(version: &str, filenames: &[&str]) -> IndexResponse {
        let mut releases = std::collections::HashMap::new();
        releases.insert(
            version.to_string(),
            filenames
                .iter()
                .map(|f| ReleaseFile { filename: f.to_string(), url: format!("https://example.com/{f}") })
                .collect(),
        );
        IndexResponse { info: InfoField { version: version.to_string() }, releases }
    }

    #[test]
    fn empty_version_uses_info_version() {
        let index = sample_index("1.2.3", &["pkg-1.2.3.tar.gz"]);
        assert_eq!(select_version(None, &index).unwrap(), "1.2.3");
        assert_eq!(select_version(Some(""), &index).unwrap(), "1.2.3");
        assert_eq!(select_version(Some("0.0.0"), &index).unwrap(), "1.2.3");
    }

    #[test]
    fn exact_version_is_used_when_present() {
        let index = sample_index("1.2.3", &["pkg-1.2.3.tar.gz"]);
        assert_eq!(select_version(Some("1.2.3"), &index).unwrap(), "1.2.3");
    }

    #[test]
    fn tar_gz_preferred_over_whl() {
        let files = vec![
            ReleaseFile { filename: "pkg-1.0-py3.whl".to_string(), url: "u1".to_string() },
            ReleaseFile { filename: "pkg-1.0.tar.gz".to_string(), url: "u2".to_string() },
        ];
        let chosen = select_archive(&files).unwrap();
        assert!(chosen.filename.ends_with(".tar.gz"));
    }

    #[test]
    fn no_compatible_archive_returns_none() {
        let files = vec![ReleaseFile { filename: "pkg-1.0.msi".to_string(), url: "u".to_string() }];
        assert!(select_archive(&files).is_none());
    }
}
