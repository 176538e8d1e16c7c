//! OSSF Scorecard hygiene lookup, queried from deps.dev (which republishes
//! scorecard results per package version rather than requiring a separate
//! GitHub-repo resolution step).

use crate::error::Result;
use pyreach_core::models::Scorecard;
use serde::Deserialize;

const DEPS_DEV_BASE: &str = "https://api.deps.dev/v3alpha";

#[derive(Debug, Deserialize)]
struct VersionResponse {
    scorecard: Option<ScorecardField>,
}

#[derive(Debug, Deserialize)]
struct ScorecardField {
    #[serde(rename = "overallScore")]
    overall_score: Option<f64>,
}

/// Looks up the hygiene score for `name`@`version` in `ecosystem` (lower-cased,
/// as deps.dev expects). Returns `None` if deps.dev has no scorecard on file,
/// which is not an error: most packages have none.
pub async fn query_scorecard(
    client: &reqwest::Client,
    name: &str,
    version: &str,
    ecosystem: &str,
) -> Result<Option<Scorecard>> {
    let url = format!(
        "{DEPS_DEV_BASE}/systems/{}/packages/{}/versions/{}",
        ecosystem.to_lowercase(),
        urlencode(name),
        urlencode(version)
    );

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body: VersionResponse = response.json().await?;
    Ok(body.scorecard.and_then(|s| s.overall_score).map(|score| Scorecard { score }))
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_preserves_safe_characters() {
        assert_eq!(urlencode("requests"), "requests");
        assert_eq!(urlencode("2.28.0"), "2.28.0");
    }

    #[test]
    fn urlencode_escapes_unsafe_characters() {
        assert_eq!(urlencode("foo/bar"), "foo%2Fbar");
    }
}
