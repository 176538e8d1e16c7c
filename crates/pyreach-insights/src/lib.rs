//! Insights Enricher: `enrich(package_coord) -> (vulnerabilities[], scorecard?)`.
//!
//! Backed by two public HTTP APIs: osv.dev for vulnerabilities and deps.dev for
//! OSSF Scorecard hygiene data. Both calls happen concurrently per package.

pub mod cvss;
pub mod error;
pub mod osv;
pub mod scorecard;

use error::Result;
use pyreach_core::models::{PkgVuln, Scorecard};

/// A thin wrapper over a shared `reqwest::Client`; cheap to clone, reused
/// across every enrichment call in a crawl.
#[derive(Clone)]
pub struct InsightsClient {
    http: reqwest::Client,
}

impl InsightsClient {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    /// Fetches vulnerabilities and a hygiene scorecard for a single
    /// package+version. A failure in one lookup does not fail the other: each
    /// is logged and treated as empty/absent.
    pub async fn enrich(&self, name: &str, version: &str, ecosystem: &str) -> (Vec<PkgVuln>, Option<Scorecard>) {
        let (vulns, card) = tokio::join!(
            osv::query_vulnerabilities(&self.http, name, version, ecosystem),
            scorecard::query_scorecard(&self.http, name, version, ecosystem),
        );

        let vulns = vulns.unwrap_or_else(|e| {
            tracing::warn!("osv.dev lookup failed for {name}@{version}: {e}");
            Vec::new()
        });
        let card = card.unwrap_or_else(|e| {
            tracing::warn!("deps.dev scorecard lookup failed for {name}@{version}: {e}");
            None
        });

        (vulns, card)
    }
}

impl Default for InsightsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function matching the collaborator's abstract contract for
/// callers that don't need to hold onto a client across many calls.
pub async fn enrich(name: &str, version: &str, ecosystem: &str) -> Result<(Vec<PkgVuln>, Option<Scorecard>)> {
    let client = InsightsClient::new();
    Ok(client.enrich(name, version, ecosystem).await)
}
