//! Minimal DOT exporter: a standard digraph dump of a graph (full or reduced).

use crate::store::Graph;

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn to_dot(graph: &Graph) -> String {
    let mut out = String::from("digraph pyreach {\n  rankdir=LR;\n");
    for idx in graph.node_indices() {
        if let Some(pkg) = graph.get(idx) {
            out.push_str(&format!(
                "  \"{}\" [label=\"{}@{}\"];\n",
                dot_escape(&pkg.canonical_key()),
                dot_escape(&pkg.details.name),
                dot_escape(&pkg.details.version)
            ));
        }
    }
    for (s, t, edge) in graph.edges() {
        let (Some(sp), Some(tp)) = (graph.get(s), graph.get(t)) else {
            continue;
        };
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [vuln_weight={}, hygiene_weight={}];\n",
            dot_escape(&sp.canonical_key()),
            dot_escape(&tp.canonical_key()),
            edge.vuln_weight,
            edge.hygiene_weight
        ));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyreach_core::models::{Package, PackageDetails, ECOSYSTEM_PYPI};

    #[test]
    fn dot_contains_vertices_and_edges() {
        let mut g = Graph::new();
        let root = g
            .add_vertex(Package::new(PackageDetails::new("root", "0.0.0", ECOSYSTEM_PYPI), None, 0))
            .index();
        let a = g
            .add_vertex(Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, 1))
            .index();
        g.add_edge(root, a);

        let dot = to_dot(&g);
        assert!(dot.starts_with("digraph pyreach"));
        assert!(dot.contains("\"root\""));
        assert!(dot.contains("\"a\""));
        assert!(dot.contains("\"root\" -> \"a\""));
    }
}
