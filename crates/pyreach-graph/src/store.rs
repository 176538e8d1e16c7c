//! The Graph Store: a labelled directed multigraph keyed by canonical package key.
//!
//! Modeled as an arena (`petgraph::stable_graph::StableDiGraph`) with a side
//! `key -> NodeIndex` map, per the design notes: this avoids the cyclic-ownership
//! problems of a pointer-based graph and makes cloning for the reduction phase cheap.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use pyreach_core::models::Package;
use std::collections::HashMap;

/// Non-negative weights carried on every edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeData {
    pub vuln_weight: i32,
    pub hygiene_weight: i32,
}

impl EdgeData {
    pub fn raise_vuln(&mut self, weight: i32) {
        self.vuln_weight = self.vuln_weight.max(weight);
    }

    pub fn raise_hygiene(&mut self, weight: i32) {
        self.hygiene_weight = self.hygiene_weight.max(weight);
    }
}

/// Distinguishes "this key was already present" from "a fresh vertex was created"
/// at the graph boundary, rather than modeling the former as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddVertexOutcome {
    Created(NodeIndex),
    AlreadyExists(NodeIndex),
}

impl AddVertexOutcome {
    pub fn index(self) -> NodeIndex {
        match self {
            AddVertexOutcome::Created(i) | AddVertexOutcome::AlreadyExists(i) => i,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, AddVertexOutcome::Created(_))
    }
}

/// A vertex registered in the `vuln_nodes`/`low_hygiene_nodes` index, with the
/// propagated weight and the shortest path from root that produced it.
#[derive(Debug, Clone)]
pub struct WeightedNode {
    pub key: String,
    pub weight: i32,
    pub path_from_root: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Graph {
    inner: StableDiGraph<Package, EdgeData>,
    index: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
    pub vuln_nodes: HashMap<String, WeightedNode>,
    pub low_hygiene_nodes: HashMap<String, WeightedNode>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
            root: None,
            vuln_nodes: HashMap::new(),
            low_hygiene_nodes: HashMap::new(),
        }
    }

    /// Adds a vertex, keyed by its canonical package key. Returns whether it was
    /// freshly created or already present (the first successful creation for a
    /// key wins; later discoveries must attach edges, not mutate depth).
    pub fn add_vertex(&mut self, pkg: Package) -> AddVertexOutcome {
        let key = pkg.canonical_key();
        if let Some(&idx) = self.index.get(&key) {
            return AddVertexOutcome::AlreadyExists(idx);
        }
        let idx = self.inner.add_node(pkg);
        self.index.insert(key, idx);
        AddVertexOutcome::Created(idx)
    }

    pub fn set_root(&mut self, idx: NodeIndex) {
        self.root = Some(idx);
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn index_of(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(&key.to_lowercase()).copied()
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Package> {
        self.inner.node_weight(idx)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Package> {
        self.inner.node_weight_mut(idx)
    }

    /// Adds a directed edge if one doesn't already exist between the two vertices.
    /// A self-loop is never created. Edge weights start at zero.
    pub fn add_edge(&mut self, src: NodeIndex, dst: NodeIndex) {
        if src == dst {
            return;
        }
        if self.inner.find_edge(src, dst).is_some() {
            return;
        }
        self.inner.add_edge(src, dst, EdgeData::default());
    }

    pub fn edge_data_mut(&mut self, src: NodeIndex, dst: NodeIndex) -> Option<&mut EdgeData> {
        let edge = self.inner.find_edge(src, dst)?;
        self.inner.edge_weight_mut(edge)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.node_indices()
    }

    pub fn successors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.neighbors_directed(idx, Direction::Outgoing)
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &EdgeData)> {
        self.inner
            .edge_indices()
            .filter_map(move |e| self.inner.edge_endpoints(e).map(|(s, t)| (s, t, &self.inner[e])))
    }

    pub fn remove_edge(&mut self, src: NodeIndex, dst: NodeIndex) {
        if let Some(e) = self.inner.find_edge(src, dst) {
            self.inner.remove_edge(e);
        }
    }

    pub fn remove_vertex(&mut self, idx: NodeIndex) {
        if let Some(pkg) = self.inner.node_weight(idx) {
            self.index.remove(&pkg.canonical_key());
        }
        self.inner.remove_node(idx);
    }

    /// Breadth-first search from `start`, returning the set of reachable vertices
    /// (including `start` itself).
    pub fn bfs_reachable(&self, start: NodeIndex) -> std::collections::HashSet<NodeIndex> {
        let mut visited = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        visited.insert(start);
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for next in self.successors(node) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Shortest unweighted path from `start` to `target`, as a sequence of vertex
    /// indices including both endpoints. `None` if unreachable.
    pub fn shortest_path(&self, start: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        if start == target {
            return Some(vec![start]);
        }
        let mut prev: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        visited.insert(start);
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for next in self.successors(node) {
                if visited.insert(next) {
                    prev.insert(next, node);
                    if next == target {
                        let mut path = vec![target];
                        let mut cur = target;
                        while let Some(&p) = prev.get(&cur) {
                            path.push(p);
                            cur = p;
                        }
                        path.reverse();
                        return Some(path);
                    }
                    queue.push_back(next);
                }
            }
        }
        None
    }

    pub fn key_of(&self, idx: NodeIndex) -> Option<String> {
        self.inner.node_weight(idx).map(|p| p.canonical_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyreach_core::models::{Package, PackageDetails, ECOSYSTEM_PYPI};

    fn pkg(name: &str, depth: u32) -> Package {
        Package::new(PackageDetails::new(name, "1.0", ECOSYSTEM_PYPI), None, depth)
    }

    #[test]
    fn add_vertex_is_idempotent_by_key() {
        let mut g = Graph::new();
        let a1 = g.add_vertex(pkg("Requests", 0));
        let a2 = g.add_vertex(pkg("requests", 0));
        assert!(a1.is_new());
        assert!(!a2.is_new());
        assert_eq!(a1.index(), a2.index());
    }

    #[test]
    fn self_loop_not_created() {
        let mut g = Graph::new();
        let a = g.add_vertex(pkg("a", 0)).index();
        g.add_edge(a, a);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn bfs_reachable_finds_transitive_children() {
        let mut g = Graph::new();
        let root = g.add_vertex(pkg("root", 0)).index();
        let a = g.add_vertex(pkg("a", 1)).index();
        let b = g.add_vertex(pkg("b", 2)).index();
        let unreachable = g.add_vertex(pkg("c", 1)).index();
        g.add_edge(root, a);
        g.add_edge(a, b);

        let reachable = g.bfs_reachable(root);
        assert!(reachable.contains(&root));
        assert!(reachable.contains(&a));
        assert!(reachable.contains(&b));
        assert!(!reachable.contains(&unreachable));
    }

    #[test]
    fn shortest_path_returns_full_vertex_sequence() {
        let mut g = Graph::new();
        let root = g.add_vertex(pkg("root", 0)).index();
        let a = g.add_vertex(pkg("a", 1)).index();
        let b = g.add_vertex(pkg("b", 2)).index();
        g.add_edge(root, a);
        g.add_edge(a, b);

        let path = g.shortest_path(root, b).unwrap();
        assert_eq!(path, vec![root, a, b]);
    }
}
