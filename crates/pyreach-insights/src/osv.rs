//! OSV batch vulnerability query client.
//!
//! Queries `api.osv.dev`'s query endpoint for a single package+ecosystem and
//! converts each returned entry into a [`PkgVuln`], applying the severity
//! normalization rules described in the Insights Enricher contract.

use crate::cvss;
use crate::error::Result;
use pyreach_core::models::{Impact, PkgVuln, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const OSV_QUERY_URL: &str = "https://api.osv.dev/v1/query";

#[derive(Debug, Serialize)]
struct OsvQueryRequest<'a> {
    package: OsvPackageRef<'a>,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct OsvPackageRef<'a> {
    name: &'a str,
    ecosystem: &'a str,
}

#[derive(Debug, Deserialize)]
struct OsvQueryResponse {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    summary: Option<String>,
    #[serde(default)]
    severity: Vec<OsvSeverity>,
}

#[derive(Debug, Deserialize)]
struct OsvSeverity {
    #[serde(rename = "type")]
    severity_type: String,
    score: String,
}

/// Queries osv.dev for every known vulnerability affecting `name`@`version` in
/// `ecosystem` and returns normalized [`PkgVuln`] records. Malformed severity
/// vectors are tolerated: that one severity entry is skipped, not the whole
/// vulnerability.
pub async fn query_vulnerabilities(
    client: &reqwest::Client,
    name: &str,
    version: &str,
    ecosystem: &str,
) -> Result<Vec<PkgVuln>> {
    let request = OsvQueryRequest {
        package: OsvPackageRef { name, ecosystem },
        version,
    };

    let response: OsvQueryResponse = client
        .post(OSV_QUERY_URL)
        .json(&request)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.vulns.into_iter().filter_map(convert).collect())
}

fn convert(entry: OsvVulnerability) -> Option<PkgVuln> {
    if entry.id.is_empty() {
        tracing::debug!("dropping osv.dev entry with empty id");
        return None;
    }

    let cve = entry
        .aliases
        .iter()
        .find(|a| a.to_uppercase().starts_with("CVE-"))
        .cloned();

    let (base_severity, other_severities) = normalize_severities(&entry.severity);

    Some(PkgVuln {
        id: entry.id,
        cve,
        aliases: entry.aliases,
        title: entry.summary.unwrap_or_default(),
        base_severity,
        other_severities,
    })
}

/// Picks the preferred base severity (CVSS 3.x > CVSS 2.0 > any unrecognized
/// type > sentinel) and returns it alongside every other parseable entry keyed
/// by its reported type string.
fn normalize_severities(entries: &[OsvSeverity]) -> (Severity, HashMap<String, Severity>) {
    let mut by_type: HashMap<String, Severity> = HashMap::new();

    for entry in entries {
        let Some((score, impact)) = cvss::base_score(&entry.score) else {
            tracing::debug!("unparseable cvss vector {:?}", entry.score);
            continue;
        };
        let severity_type = match cvss::detect_version(&entry.score) {
            cvss::CvssVersion::V3 => "cvss3",
            cvss::CvssVersion::V2 => "cvss2",
        };
        by_type.insert(
            entry.severity_type.clone(),
            Severity {
                score,
                impact,
                severity_type: severity_type.to_string(),
                vector: entry.score.clone(),
            },
        );
    }

    let base = by_type
        .values()
        .find(|s| s.severity_type == "cvss3")
        .or_else(|| by_type.values().find(|s| s.severity_type == "cvss2"))
        .or_else(|| by_type.values().next())
        .cloned()
        .unwrap_or_else(|| {
            if !entries.is_empty() {
                tracing::debug!("no parseable severity among {} entries, using sentinel", entries.len());
            }
            Severity::sentinel()
        });

    (base, by_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_dropped() {
        let entry = OsvVulnerability { id: String::new(), aliases: vec![], summary: None, severity: vec![] };
        assert!(convert(entry).is_none());
    }

    #[test]
    fn first_cve_alias_is_used() {
        let entry = OsvVulnerability {
            id: "GHSA-xxxx".to_string(),
            aliases: vec!["GHSA-yyyy".to_string(), "CVE-2024-1111".to_string(), "CVE-2024-2222".to_string()],
            summary: Some("test".to_string()),
            severity: vec![],
        };
        let vuln = convert(entry).unwrap();
        assert_eq!(vuln.cve.as_deref(), Some("CVE-2024-1111"));
    }

    #[test]
    fn prefers_cvss3_over_cvss2() {
        let entries = vec![
            OsvSeverity { severity_type: "CVSS_V2".to_string(), score: "AV:N/AC:L/Au:N/C:C/I:C/A:C".to_string() },
            OsvSeverity {
                severity_type: "CVSS_V3".to_string(),
                score: "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H".to_string(),
            },
        ];
        let (base, others) = normalize_severities(&entries);
        assert_eq!(base.severity_type, "cvss3");
        assert_eq!(base.impact, Impact::Critical);
        assert_eq!(others.len(), 2);
    }

    #[test]
    fn no_severities_yields_sentinel() {
        let (base, others) = normalize_severities(&[]);
        assert_eq!(base.score, -1);
        assert_eq!(base.severity_type, "NA");
        assert!(others.is_empty());
    }

    #[test]
    fn unparseable_vector_is_skipped_not_fatal() {
        let entries = vec![OsvSeverity { severity_type: "CVSS_V3".to_string(), score: "garbage".to_string() }];
        let (base, others) = normalize_severities(&entries);
        assert_eq!(base.severity_type, "NA");
        assert!(others.is_empty());
    }
}
