//! Reachability Reducer: prunes edges unsupported by import/export evidence, then
//! drops every vertex no longer reachable from root.

use crate::store::Graph;

/// Governs the substring-of-name fallback in the edge-pruning rule (§9 open question).
#[derive(Debug, Clone, Copy)]
pub struct ReductionPolicy {
    /// When true, an edge also survives if any of the source's imported modules is
    /// a substring of the target package's name (handles `import foo.bar` where the
    /// dependency is published as `foo-bar`).
    pub substring_heuristic: bool,
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            substring_heuristic: true,
        }
    }
}

/// Clones `graph`, prunes edges that lack import/export evidence, then deletes
/// every vertex unreachable from root in the pruned edge set. The input graph is
/// left untouched.
pub fn reduce(graph: &Graph, policy: ReductionPolicy) -> Graph {
    let mut reduced = graph.clone();

    let edges: Vec<_> = reduced.edges().map(|(s, t, _)| (s, t)).collect();
    for (s, t) in edges {
        let keep = {
            let source = reduced.get(s).expect("edge endpoint must exist");
            let target = reduced.get(t).expect("edge endpoint must exist");
            edge_has_evidence(source.imported_modules(), target.exported_modules(), &target.details.name, policy)
        };
        if !keep {
            reduced.remove_edge(s, t);
        }
    }

    if let Some(root) = reduced.root() {
        let reachable = reduced.bfs_reachable(root);
        let unreachable: Vec<_> = reduced
            .node_indices()
            .filter(|n| !reachable.contains(n))
            .collect();
        for n in unreachable {
            reduced.remove_vertex(n);
        }
    }

    reduced
}

fn edge_has_evidence(
    imported: &std::collections::HashSet<String>,
    exported: &std::collections::HashSet<String>,
    target_name: &str,
    policy: ReductionPolicy,
) -> bool {
    if imported.intersection(exported).next().is_some() {
        return true;
    }
    if policy.substring_heuristic {
        let target_lower = target_name.to_lowercase();
        if imported.iter().any(|m| target_lower.contains(&m.to_lowercase())) {
            return true;
        }
    }
    false
}
