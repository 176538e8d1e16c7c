//! Distribution Metadata Parser: reads an extracted package's
//! `*.dist-info/METADATA` file and turns each `Requires-Dist` header into a
//! [`PackageDetails`].

use pyreach_core::models::{PackageDetails, ECOSYSTEM_PYPI};
use std::path::Path;
use walkdir::WalkDir;

const VERSION_MATCHERS: [&str; 6] = ["==", ">=", "<=", "~=", ">", "<"];

/// Locates the first `.dist-info/METADATA` file under `extracted_dir` and
/// returns the dependencies declared in its `Requires-Dist` headers. Returns
/// an empty list if no such file exists or it cannot be read.
pub fn read_requires_dist(extracted_dir: &Path) -> Vec<PackageDetails> {
    let Some(metadata_path) = find_metadata_file(extracted_dir) else {
        tracing::debug!("no .dist-info/METADATA found under {:?}", extracted_dir);
        return Vec::new();
    };

    let Ok(contents) = std::fs::read_to_string(&metadata_path) else {
        tracing::debug!("failed to read {:?}", metadata_path);
        return Vec::new();
    };

    parse_requires_dist(&contents)
}

fn find_metadata_file(root: &Path) -> Option<std::path::PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.path().to_string_lossy().ends_with(".dist-info/METADATA"))
        .map(|e| e.path().to_path_buf())
}

/// Parses an RFC-5322-style METADATA body, collecting every `Requires-Dist:`
/// header (case-sensitive, as PEP 566 mandates).
fn parse_requires_dist(contents: &str) -> Vec<PackageDetails> {
    contents
        .lines()
        .filter_map(|line| line.strip_prefix("Requires-Dist: ").or_else(|| line.strip_prefix("Requires-Dist:")))
        .filter_map(parse_requirement)
        .collect()
}

/// `requests (>=2.0,<3.0) ; extra == "http"` -> name = "requests", version
/// extracted from the first matching operator in the preferred order.
fn parse_requirement(raw: &str) -> Option<PackageDetails> {
    let spec = raw.split(';').next().unwrap_or(raw).trim();
    if spec.is_empty() {
        return None;
    }

    let name_end = spec.find(|c: char| " ><=!~(".contains(c)).unwrap_or(spec.len());
    let name = spec[..name_end].trim();
    if name.is_empty() {
        return None;
    }

    let rest = &spec[name_end..];
    let version = VERSION_MATCHERS
        .iter()
        .find_map(|op| extract_version_after(rest, op))
        .unwrap_or_else(|| "0.0.0".to_string());

    Some(PackageDetails::new(name, version, ECOSYSTEM_PYPI))
}

fn extract_version_after(rest: &str, op: &str) -> Option<String> {
    let idx = rest.find(op)?;
    let after = &rest[idx + op.len()..];
    let digits: String = after.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}
