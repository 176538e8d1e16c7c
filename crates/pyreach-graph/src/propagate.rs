//! Risk Propagator: depth-decayed weight propagation onto edges along the
//! shortest root-to-vertex path, for every vertex with a positive vuln or
//! reverse-hygiene score.

use crate::store::{Graph, WeightedNode};

/// Runs vulnerability and hygiene propagation over the reduced graph in place.
pub fn propagate(graph: &mut Graph) {
    let Some(root) = graph.root() else {
        return;
    };

    let candidates: Vec<_> = graph
        .node_indices()
        .filter(|&idx| idx != root)
        .collect();

    for idx in candidates {
        let Some(path) = graph.shortest_path(root, idx) else {
            continue;
        };
        // L = number of edges on the path, identical for both propagations (§4.6/§4.7).
        let l = (path.len() - 1) as i32;

        let pkg = graph.get(idx).expect("vertex must exist");
        let max_vuln_score = pkg.max_vuln_score;
        let reverse_scorecard = pkg.reverse_scorecard_score();
        let key = pkg.canonical_key();

        if max_vuln_score - l > 0 {
            let weight = max_vuln_score - l + 1;
            let path_keys: Vec<String> = path.iter().filter_map(|&i| graph.key_of(i)).collect();
            graph.vuln_nodes.insert(
                key.clone(),
                WeightedNode {
                    key: key.clone(),
                    weight,
                    path_from_root: path_keys,
                },
            );
            raise_path_weights(graph, &path, |edge| edge.raise_vuln(weight));
        }

        if reverse_scorecard - l > 0 {
            let weight = reverse_scorecard - l;
            let path_keys: Vec<String> = path.iter().filter_map(|&i| graph.key_of(i)).collect();
            graph.low_hygiene_nodes.insert(
                key.clone(),
                WeightedNode {
                    key,
                    weight,
                    path_from_root: path_keys,
                },
            );
            raise_path_weights(graph, &path, |edge| edge.raise_hygiene(weight));
        }
    }
}

fn raise_path_weights(
    graph: &mut Graph,
    path: &[petgraph::stable_graph::NodeIndex],
    mut raise: impl FnMut(&mut crate::store::EdgeData),
) {
    for pair in path.windows(2) {
        if let Some(edge) = graph.edge_data_mut(pair[0], pair[1]) {
            raise(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyreach_core::models::{Impact, Package, PackageDetails, PkgVuln, Severity, ECOSYSTEM_PYPI};

    fn pkg(name: &str, depth: u32) -> Package {
        Package::new(PackageDetails::new(name, "1.0", ECOSYSTEM_PYPI), None, depth)
    }

    fn vuln(score: i32) -> PkgVuln {
        PkgVuln {
            id: "CVE-TEST".into(),
            cve: Some("CVE-TEST".into()),
            aliases: vec![],
            title: String::new(),
            base_severity: Severity {
                score,
                impact: Impact::Critical,
                severity_type: "cvss3".into(),
                vector: String::new(),
            },
            other_severities: Default::default(),
        }
    }

    #[test]
    fn linear_chain_reachable_vuln_scenario() {
        // root -> A -> B, B has a CVE scoring 9.
        let mut g = Graph::new();
        let root = g.add_vertex(pkg("root", 0)).index();
        g.set_root(root);
        let a = g.add_vertex(pkg("liba", 1)).index();
        let mut b_pkg = pkg("libb", 2);
        b_pkg.add_vulnerabilities([vuln(9)]);
        let b = g.add_vertex(b_pkg).index();
        g.add_edge(root, a);
        g.add_edge(a, b);

        propagate(&mut g);

        let node = g.vuln_nodes.get("libb").expect("libb registered");
        assert_eq!(node.weight, 8); // 9 - 2 + 1
        assert_eq!(node.path_from_root, vec!["root", "liba", "libb"]);

        assert_eq!(g.edge_data_mut(root, a).unwrap().vuln_weight, 8);
        assert_eq!(g.edge_data_mut(a, b).unwrap().vuln_weight, 8);
    }

    #[test]
    fn score_not_exceeding_depth_is_not_registered() {
        let mut g = Graph::new();
        let root = g.add_vertex(pkg("root", 0)).index();
        g.set_root(root);
        let a = g.add_vertex(pkg("liba", 1)).index();
        let mut b_pkg = pkg("libb", 2);
        b_pkg.add_vulnerabilities([vuln(2)]); // score <= depth(=2 edges)
        let b = g.add_vertex(b_pkg).index();
        g.add_edge(root, a);
        g.add_edge(a, b);

        propagate(&mut g);

        assert!(!g.vuln_nodes.contains_key("libb"));
    }
}
