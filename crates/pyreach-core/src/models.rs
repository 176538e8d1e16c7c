//! Shared data model: package coordinates, manifests, and vulnerability records.
//!
//! Mirrors the original system's `pkg/core/models` package: these types are consumed
//! by the graph store, the fetcher, the scanner and the insights client alike.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ecosystem identifier. Only PyPI is produced by this engine, but the field is kept
/// as a string (not an enum) since collaborators may report others.
pub type Ecosystem = String;

pub const ECOSYSTEM_PYPI: &str = "PyPI";

/// Coordinates that identify a single package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    /// Name to use for comparison purposes; defaults to `name`.
    pub compare_as: String,
    pub commit: Option<String>,
}

impl PackageDetails {
    pub fn new(name: impl Into<String>, version: impl Into<String>, ecosystem: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            compare_as: name.clone(),
            name,
            version: version.into(),
            ecosystem: ecosystem.into(),
            commit: None,
        }
    }

    /// Canonical graph vertex key: the lower-cased package name.
    pub fn canonical_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Where a package was discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub path: String,
    pub display_path: String,
    pub ecosystem: Ecosystem,
}

/// Severity impact band, ordered worst-to-best by CVSS convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Impact::Unknown => "UNKNOWN",
            Impact::Low => "LOW",
            Impact::Medium => "MEDIUM",
            Impact::High => "HIGH",
            Impact::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

/// A single normalized severity entry (one CVSS vector's worth).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Severity {
    /// Base score rounded to the nearest integer in 0..10, or -1 for the sentinel.
    pub score: i32,
    pub impact: Impact,
    /// "cvss2", "cvss3", "unknown" or "NA" for the sentinel.
    pub severity_type: String,
    pub vector: String,
}

impl Severity {
    /// The sentinel severity used when a vulnerability carries no parseable vector.
    pub fn sentinel() -> Self {
        Self {
            score: -1,
            impact: Impact::Unknown,
            severity_type: "NA".to_string(),
            vector: String::new(),
        }
    }
}

/// A single vulnerability record as produced by the Insights Enricher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PkgVuln {
    pub id: String,
    pub cve: Option<String>,
    pub aliases: Vec<String>,
    pub title: String,
    pub base_severity: Severity,
    pub other_severities: HashMap<String, Severity>,
}

/// Floating-point package hygiene score in 0..10, 10 = best.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: f64,
}

impl Scorecard {
    /// `round(10 - score)`; larger means worse hygiene.
    pub fn reverse_score(&self) -> i32 {
        (10.0 - self.score).round() as i32
    }
}

/// The vertex payload: everything the graph knows about a single package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub details: PackageDetails,
    pub manifest: Option<Manifest>,
    imported_modules: std::collections::HashSet<String>,
    exported_modules: std::collections::HashSet<String>,
    pub vulns: Vec<PkgVuln>,
    pub max_vuln_score: i32,
    pub scorecard: Option<Scorecard>,
    pub depth: u32,
}

impl Package {
    pub fn new(details: PackageDetails, manifest: Option<Manifest>, depth: u32) -> Self {
        Self {
            details,
            manifest,
            imported_modules: Default::default(),
            exported_modules: Default::default(),
            vulns: Vec::new(),
            max_vuln_score: 0,
            scorecard: None,
            depth,
        }
    }

    pub fn canonical_key(&self) -> String {
        self.details.canonical_key()
    }

    pub fn add_imported_modules(&mut self, modules: impl IntoIterator<Item = String>) {
        self.imported_modules.extend(modules);
    }

    pub fn add_exported_modules(&mut self, modules: impl IntoIterator<Item = String>) {
        self.exported_modules.extend(modules);
    }

    pub fn imported_modules(&self) -> &std::collections::HashSet<String> {
        &self.imported_modules
    }

    pub fn exported_modules(&self) -> &std::collections::HashSet<String> {
        &self.exported_modules
    }

    /// Adds vulnerabilities, dropping any with an empty id, and keeps
    /// `max_vuln_score` monotonically non-decreasing.
    pub fn add_vulnerabilities(&mut self, vulns: impl IntoIterator<Item = PkgVuln>) {
        for vuln in vulns {
            if vuln.id.is_empty() {
                tracing::debug!("dropping vulnerability with empty id");
                continue;
            }
            self.max_vuln_score = self.max_vuln_score.max(vuln.base_severity.score);
            self.vulns.push(vuln);
        }
    }

    pub fn add_scorecard(&mut self, scorecard: Option<Scorecard>) {
        self.scorecard = scorecard;
    }

    pub fn reverse_scorecard_score(&self) -> i32 {
        self.scorecard.map(|s| s.reverse_score()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_is_lowercased() {
        let d = PackageDetails::new("Requests", "2.28.0", ECOSYSTEM_PYPI);
        assert_eq!(d.canonical_key(), "requests");
    }

    #[test]
    fn max_vuln_score_is_monotonic() {
        let mut pkg = Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, 1);
        pkg.add_vulnerabilities([PkgVuln {
            id: "CVE-1".into(),
            cve: Some("CVE-1".into()),
            aliases: vec![],
            title: String::new(),
            base_severity: Severity { score: 5, impact: Impact::Medium, severity_type: "cvss3".into(), vector: String::new() },
            other_severities: HashMap::new(),
        }]);
        assert_eq!(pkg.max_vuln_score, 5);
        pkg.add_vulnerabilities([PkgVuln {
            id: "CVE-2".into(),
            cve: Some("CVE-2".into()),
            aliases: vec![],
            title: String::new(),
            base_severity: Severity { score: 3, impact: Impact::Low, severity_type: "cvss3".into(), vector: String::new() },
            other_severities: HashMap::new(),
        }]);
        assert_eq!(pkg.max_vuln_score, 5, "score must never decrease");
    }

    #[test]
    fn empty_id_vulnerability_is_dropped() {
        let mut pkg = Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, 1);
        pkg.add_vulnerabilities([PkgVuln {
            id: String::new(),
            cve: None,
            aliases: vec![],
            title: String::new(),
            base_severity: Severity::sentinel(),
            other_severities: HashMap::new(),
        }]);
        assert!(pkg.vulns.is_empty());
    }

    #[test]
    fn reverse_scorecard_score_inverts() {
        let sc = Scorecard { score: 7.3 };
        assert_eq!(sc.reverse_score(), 3);
    }
}
