//! Manifest detection and parsing: `poetry.lock`, `Pipfile.lock`,
//! `requirements.txt`, `pyproject.toml`, checked in that priority order. Only
//! the first found is scanned.

use crate::error::{Result, ScanError};
use pyreach_core::models::{PackageDetails, ECOSYSTEM_PYPI};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PoetryLock,
    PipfileLock,
    RequirementsTxt,
    PyProjectToml,
}

impl ManifestKind {
    fn filename(self) -> &'static str {
        match self {
            ManifestKind::PoetryLock => "poetry.lock",
            ManifestKind::PipfileLock => "Pipfile.lock",
            ManifestKind::RequirementsTxt => "requirements.txt",
            ManifestKind::PyProjectToml => "pyproject.toml",
        }
    }
}

const PRIORITY: [ManifestKind; 4] =
    [ManifestKind::PoetryLock, ManifestKind::PipfileLock, ManifestKind::RequirementsTxt, ManifestKind::PyProjectToml];

/// Returns the first manifest found under `project_dir` in priority order.
pub fn locate_manifest(project_dir: &Path) -> Option<(ManifestKind, PathBuf)> {
    PRIORITY.into_iter().find_map(|kind| {
        let path = project_dir.join(kind.filename());
        path.is_file().then_some((kind, path))
    })
}

/// Parses the manifest at `path` into a flat list of `PackageDetails`.
pub fn parse_manifest(kind: ManifestKind, path: &Path) -> Result<Vec<PackageDetails>> {
    let content = std::fs::read_to_string(path).map_err(|source| ScanError::Io { path: path.to_path_buf(), source })?;
    match kind {
        ManifestKind::PoetryLock => parse_poetry_lock(&content),
        ManifestKind::PipfileLock => parse_pipfile_lock(&content),
        ManifestKind::RequirementsTxt => Ok(parse_requirements_txt(&content)),
        ManifestKind::PyProjectToml => parse_pyproject_toml(&content),
    }
}

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default)]
    package: Vec<PoetryPackage>,
}

#[derive(Debug, Deserialize)]
struct PoetryPackage {
    name: String,
    version: String,
}

fn parse_poetry_lock(content: &str) -> Result<Vec<PackageDetails>> {
    let lock: PoetryLock = toml::from_str(content).map_err(|e| ScanError::Parse(e.to_string()))?;
    Ok(lock.package.into_iter().map(|p| PackageDetails::new(p.name, p.version, ECOSYSTEM_PYPI)).collect())
}

#[derive(Debug, Deserialize)]
struct PipfileLock {
    #[serde(default)]
    default: HashMap<String, PipfileDependency>,
    #[serde(default, rename = "develop")]
    dev: HashMap<String, PipfileDependency>,
}

#[derive(Debug, Deserialize)]
struct PipfileDependency {
    version: Option<String>,
}

fn parse_pipfile_lock(content: &str) -> Result<Vec<PackageDetails>> {
    let lock: PipfileLock = serde_json::from_str(content).map_err(|e| ScanError::Parse(e.to_string()))?;
    // `develop` is parsed for schema fidelity but dev dependencies are out of
    // scope for reachability, so only `default` feeds the seed set.
    Ok(lock
        .default
        .into_iter()
        .map(|(name, dep)| {
            let version = dep.version.unwrap_or_default().trim_start_matches("==").to_string();
            PackageDetails::new(name, version, ECOSYSTEM_PYPI)
        })
        .collect())
}

/// Supports `Django==3.2.0`, `requests>=2.25.0`, `pytest~=7.0`, environment
/// markers (`; python_version >= "3.6"`), inline comments and `-e`/`-r`/`--`
/// pip-option lines (skipped).
fn parse_requirements_txt(content: &str) -> Vec<PackageDetails> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| !line.starts_with("-e") && !line.starts_with("-r") && !line.starts_with("--"))
        .filter_map(parse_requirement_line)
        .map(|(name, version)| PackageDetails::new(name, version, ECOSYSTEM_PYPI))
        .collect()
}

fn parse_requirement_line(line: &str) -> Option<(String, String)> {
    let line = line.split(';').next()?.trim();
    let line = line.split('#').next()?.trim();

    for op in ["===", "==", "~=", ">=", "<=", ">", "<", "!="] {
        if let Some(idx) = line.find(op) {
            let name = line[..idx].trim();
            let version = line[idx + op.len()..].trim();
            let version = version.split('[').next().unwrap_or(version).trim();
            if !name.is_empty() && !version.is_empty() {
                return Some((name.to_string(), version.to_string()));
            }
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct PyProjectToml {
    project: Option<PyProjectProject>,
    tool: Option<PyProjectTool>,
}

#[derive(Debug, Deserialize)]
struct PyProjectProject {
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default, rename = "optional-dependencies")]
    optional_dependencies: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PyProjectTool {
    poetry: Option<PoetryConfig>,
}

#[derive(Debug, Deserialize)]
struct PoetryConfig {
    #[serde(default)]
    dependencies: HashMap<String, toml::Value>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: HashMap<String, toml::Value>,
}

fn parse_pyproject_toml(content: &str) -> Result<Vec<PackageDetails>> {
    let doc: PyProjectToml = toml::from_str(content).map_err(|e| ScanError::Parse(e.to_string()))?;
    let mut packages = Vec::new();

    if let Some(project) = doc.project {
        for spec in project.dependencies.iter().chain(project.optional_dependencies.values().flatten()) {
            if let Some((name, version)) = parse_dependency_spec(spec) {
                packages.push(PackageDetails::new(name, version, ECOSYSTEM_PYPI));
            }
        }
    }

    if let Some(tool) = doc.tool {
        if let Some(poetry) = tool.poetry {
            for (name, spec) in poetry.dependencies.iter().chain(poetry.dev_dependencies.iter()) {
                if name == "python" {
                    continue;
                }
                packages.push(PackageDetails::new(name.clone(), extract_poetry_version(spec), ECOSYSTEM_PYPI));
            }
        }
    }

    Ok(packages)
}

fn parse_dependency_spec(spec: &str) -> Option<(String, String)> {
    let spec = spec.split(';').next()?.trim();
    for op in ["===", "==", "~=", ">=", "<=", ">", "<", "!="] {
        if let Some(idx) = spec.find(op) {
            let name = spec[..idx].trim();
            let version = spec[idx + op.len()..].trim();
            let version = version.split('[').next().unwrap_or(version).trim();
            let version = version.split(',').next().unwrap_or(version).trim();
            if !name.is_empty() && !version.is_empty() {
                return Some((name.to_string(), version.to_string()));
            }
        }
    }
    if !spec.is_empty() && !spec.contains(|c: char| c.is_whitespace() || c == '[') {
        return Some((spec.to_string(), "0.0.0".to_string()));
    }
    None
}

fn extract_poetry_version(spec: &toml::Value) -> String {
    let raw = match spec {
        toml::Value::String(v) => v.clone(),
        toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()).unwrap_or("0.0.0").to_string(),
        _ => "0.0.0".to_string(),
    };
    let raw = raw.trim();

    if let Some(stripped) = raw.strip_prefix('^').or_else(|| raw.strip_prefix('~')) {
        return stripped.to_string();
    }
    for op in ["===", "==", ">=", "<=", ">", "<", "!="] {
        if let Some(idx) = raw.find(op) {
            let version = raw[idx + op.len()..].trim();
            let version = version.split(',').next().unwrap_or(version).trim();
            if !version.is_empty() {
                return version.to_string();
            }
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_txt_handles_operators_and_markers() {
        let content = "\n# comment\nDjango==3.2.0\nrequests>=2.25.0\npytest~=7.0\nsix==1.16.0 ; python_version >= \"3.6\"\n-e ./local-pkg\n";
        let packages = parse_requirements_txt(content);
        assert_eq!(packages.len(), 4);
        assert!(packages.iter().any(|p| p.name == "Django" && p.version == "3.2.0"));
        assert!(packages.iter().any(|p| p.name == "six" && p.version == "1.16.0"));
    }

    #[test]
    fn poetry_lock_parses_package_table() {
        let content = "[[package]]\nname = \"requests\"\nversion = \"2.28.0\"\n";
        let packages = parse_poetry_lock(content).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "requests");
        assert_eq!(packages[0].version, "2.28.0");
    }

    #[test]
    fn pipfile_lock_strips_pin_operator() {
        let content = r#"{"default": {"requests": {"version": "==2.28.0"}}, "develop": {}}"#;
        let packages = parse_pipfile_lock(content).unwrap();
        assert_eq!(packages[0].name, "requests");
        assert_eq!(packages[0].version, "2.28.0");
    }

    #[test]
    fn pipfile_lock_excludes_develop_dependencies() {
        let content = r#"{
            "default": {"requests": {"version": "==2.28.0"}},
            "develop": {"pytest": {"version": "==7.0.0"}}
        }"#;
        let packages = parse_pipfile_lock(content).unwrap();
        assert_eq!(packages.len(), 1);
        assert!(packages.iter().all(|p| p.name != "pytest"));
    }

    #[test]
    fn pyproject_pep621_and_poetry_sections() {
        let content = r#"
[project]
dependencies = ["requests>=2.0"]

[tool.poetry.dependencies]
python = "^3.9"
flask = "^2.0.1"
"#;
        let packages = parse_pyproject_toml(content).unwrap();
        assert!(packages.iter().any(|p| p.name == "requests" && p.version == "2.0"));
        assert!(packages.iter().any(|p| p.name == "flask" && p.version == "2.0.1"));
        assert!(!packages.iter().any(|p| p.name == "python"));
    }

    #[test]
    fn locate_manifest_prefers_poetry_lock() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "requests==2.0\n").unwrap();
        std::fs::write(dir.path().join("poetry.lock"), "[[package]]\nname=\"a\"\nversion=\"1.0\"\n").unwrap();

        let (kind, _) = locate_manifest(dir.path()).unwrap();
        assert_eq!(kind, ManifestKind::PoetryLock);
    }
}
