//! Terminal report printers: the vulnerability table and the low-hygiene list.
//!
//! Both take the already-propagated reduced graph and the already-propagated
//! original (pre-reduction) graph, so that vertices pruned by the
//! reachability reducer can still be reported as removed false positives.

use colored::{ColoredString, Colorize};
use pyreach_graph::{Graph, WeightedNode};
use std::collections::HashSet;

fn priority_band(score: i32, text: &str) -> ColoredString {
    match score {
        s if s >= 9 => text.white().on_red(),
        s if (6..=8).contains(&s) => text.white().on_bright_red(),
        s if (3..=5).contains(&s) => text.white().on_blue(),
        _ => text.bright_white().on_black(),
    }
}

fn sorted_by_weight_desc(nodes: &std::collections::HashMap<String, WeightedNode>) -> Vec<&WeightedNode> {
    let mut v: Vec<&WeightedNode> = nodes.values().collect();
    v.sort_by(|a, b| b.weight.cmp(&a.weight));
    v
}

/// Renders "Prioritized List of Packages to Upgrade as per Vulnerabilities",
/// sorted descending by Cofe score, followed by a tail of vulnerable vertices
/// present in the original graph but pruned from the reduced one.
pub fn vulnerability_table(reduced: &Graph, original: &Graph) -> String {
    let mut out = String::new();
    let reduced_nodes = sorted_by_weight_desc(&reduced.vuln_nodes);

    if !reduced_nodes.is_empty() {
        out.push_str("Prioritized List of Packages to Upgrade as per Vulnerabilities:\n");
        out.push_str(&format!("{:<10} {:<30} {:>10} {:>10}  Path\n", "Ecosystem", "Name@Version", "CVSS Score", "Cofe Score"));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for node in &reduced_nodes {
        seen.insert(node.key.as_str());
        let Some(idx) = reduced.index_of(&node.key) else { continue };
        let Some(pkg) = reduced.get(idx) else { continue };
        let cvss = pkg.max_vuln_score;
        let path = node.path_from_root.join(" > ");
        out.push_str(&format!(
            "{:<10} {:<30} {:>10} {:>10}  {}\n",
            pkg.details.ecosystem,
            format!("{}@{}", pkg.details.name, pkg.details.version),
            priority_band(cvss, &cvss.to_string()),
            priority_band(node.weight, &node.weight.to_string()),
            path
        ));
    }

    let mut original_nodes = sorted_by_weight_desc(&original.vuln_nodes);
    original_nodes.retain(|n| !seen.contains(n.key.as_str()));
    if !original_nodes.is_empty() {
        for node in original_nodes {
            let Some(idx) = original.index_of(&node.key) else { continue };
            let Some(pkg) = original.get(idx) else { continue };
            let path = node.path_from_root.join(" > ");
            out.push_str(&format!(
                "{:<10} {:<30} {:>10} {:>10}  None in Reduced Graph, Removed Path: {}\n",
                pkg.details.ecosystem,
                format!("{}@{}", pkg.details.name, pkg.details.version),
                pkg.max_vuln_score,
                "None",
                path
            ));
        }
    }

    out
}

/// Renders "Prioritized List of Packages to Upgrade as per Scorecard Score"
/// using the raw (non-reversed) scorecard value in the display text, followed
/// by a "False Positives Removed after reachability analysis" tail.
pub fn low_hygiene_report(reduced: &Graph, original: &Graph) -> String {
    let mut out = String::new();
    let reduced_nodes = sorted_by_weight_desc(&reduced.low_hygiene_nodes);

    if !reduced_nodes.is_empty() {
        out.push_str("Prioritized List of Packages to Upgrade as per Scorecard Score:\n");
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for node in &reduced_nodes {
        seen.insert(node.key.as_str());
        let Some(idx) = reduced.index_of(&node.key) else { continue };
        let Some(pkg) = reduced.get(idx) else { continue };
        let raw_score = pkg.scorecard.map(|s| s.score).unwrap_or(0.0);
        let path = node.path_from_root.join(" > ");
        out.push_str(&format!(
            "\t{}/{} [Poor Hygiene] Score [{:.6}] Priority [{}] Path: {}\n",
            pkg.details.name, pkg.details.version, raw_score, node.weight, path
        ));
    }

    let mut original_nodes = sorted_by_weight_desc(&original.low_hygiene_nodes);
    original_nodes.retain(|n| !seen.contains(n.key.as_str()));
    if !original_nodes.is_empty() {
        out.push_str("\nFalse Positives Removed after reachability analysis:\n");
        for node in original_nodes {
            let Some(idx) = original.index_of(&node.key) else { continue };
            let Some(pkg) = original.get(idx) else { continue };
            let raw_score = pkg.scorecard.map(|s| s.score).unwrap_or(0.0);
            let path = node.path_from_root.join(" > ");
            out.push_str(&format!(
                "\t{}/{} [Poor Hygiene] Score [{:.6}] Priority [{}] Path: {}\n",
                pkg.details.name, pkg.details.version, raw_score, node.weight, path
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyreach_core::models::{Impact, Package, PackageDetails, PkgVuln, Severity, ECOSYSTEM_PYPI};
    use pyreach_graph::propagate::propagate;
    use pyreach_graph::reduce::{reduce, ReductionPolicy};

    fn vuln(score: i32) -> PkgVuln {
        PkgVuln {
            id: "CVE-TEST".into(),
            cve: Some("CVE-TEST".into()),
            aliases: vec![],
            title: String::new(),
            base_severity: Severity { score, impact: Impact::Critical, severity_type: "cvss3".into(), vector: String::new() },
            other_severities: Default::default(),
        }
    }

    #[test]
    fn vulnerability_table_lists_reachable_vuln() {
        let mut g = Graph::new();
        let root = g.add_vertex(Package::new(PackageDetails::new("root", "0.0.0", ECOSYSTEM_PYPI), None, 0)).index();
        g.set_root(root);
        let mut a = Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, 1);
        a.add_vulnerabilities([vuln(9)]);
        let a_idx = g.add_vertex(a).index();
        g.add_edge(root, a_idx);

        let mut original = g.clone();
        propagate(&mut original);
        let mut reduced = reduce(&g, ReductionPolicy::default());
        propagate(&mut reduced);

        let table = vulnerability_table(&reduced, &original);
        assert!(table.contains("a@1.0"));
        assert!(table.contains("PyPI"));
    }

    #[test]
    fn vulnerability_table_reports_pruned_vuln_in_removed_tail() {
        let mut g = Graph::new();
        let root = g.add_vertex(Package::new(PackageDetails::new("root", "0.0.0", ECOSYSTEM_PYPI), None, 0)).index();
        g.set_root(root);
        let mut a = Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, 1);
        a.add_vulnerabilities([vuln(9)]);
        let a_idx = g.add_vertex(a).index();
        g.add_edge(root, a_idx); // no import/export evidence -> pruned by reduce()

        let mut original = g.clone();
        propagate(&mut original);
        let mut reduced = reduce(&g, ReductionPolicy::default());
        propagate(&mut reduced);

        let table = vulnerability_table(&reduced, &original);
        assert!(table.contains("None in Reduced Graph, Removed Path"));
    }
}
