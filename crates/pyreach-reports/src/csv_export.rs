//! CSV graph exporter: an edges file and a sibling `<path>.metadata.csv` file.
//!
//! Column layouts (including two faithfully-preserved naming quirks — the
//! edges file's `vuln_score`/`hygiene_color` columns actually hold color
//! strings, and the metadata file's `node_value`/`type` columns are both the
//! vertex depth) match the system this was distilled from.

use crate::colors::{depth_timestamp, hygiene_score_color, node_color, node_scorecard_color, node_vuln_color, vuln_score_color};
use crate::error::Result;
use pyreach_graph::Graph;
use std::collections::HashSet;
use std::path::Path;

const EDGES_HEADER: &[&str] = &["source", "target", "color", "vuln_score", "hygiene_color", "vuln_weight", "hygiene_weight", "time"];
const METADATA_HEADER: &[&str] = &["id", "node_color", "vuln_color", "hygiene_color", "node_value", "type", "vuln_score", "hygiene_score"];

/// Writes `edges_path` (edges) and `{edges_path}.metadata.csv` (per-vertex
/// metadata). Only vertices that appear on at least one edge are emitted to
/// the metadata file, matching the source system's edge-driven vertex walk.
pub fn export_csv(graph: &Graph, edges_path: &Path) -> Result<()> {
    export_edges(graph, edges_path)?;

    let metadata_path = format!("{}.metadata.csv", edges_path.display());
    export_metadata(graph, Path::new(&metadata_path))?;

    Ok(())
}

fn export_edges(graph: &Graph, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EDGES_HEADER)?;

    let root = graph.root();
    for (s, t, edge) in graph.edges() {
        let (Some(source), Some(source_key)) = (graph.get(s), graph.key_of(s)) else { continue };
        let Some(target_key) = graph.key_of(t) else { continue };
        let is_root = root == Some(s);

        writer.write_record([
            source_key,
            target_key,
            node_color(source, is_root).to_string(),
            vuln_score_color(edge.vuln_weight).to_string(),
            hygiene_score_color(edge.hygiene_weight).to_string(),
            edge.vuln_weight.to_string(),
            edge.hygiene_weight.to_string(),
            depth_timestamp(source.depth),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn export_metadata(graph: &Graph, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(METADATA_HEADER)?;

    let root = graph.root();
    let mut seen = HashSet::new();
    for (s, t, _) in graph.edges() {
        for idx in [s, t] {
            if !seen.insert(idx) {
                continue;
            }
            let Some(pkg) = graph.get(idx) else { continue };
            let Some(key) = graph.key_of(idx) else { continue };
            let is_root = root == Some(idx);

            writer.write_record([
                key,
                node_color(pkg, is_root).to_string(),
                node_vuln_color(pkg, is_root).to_string(),
                node_scorecard_color(pkg, is_root).to_string(),
                pkg.depth.to_string(),
                pkg.depth.to_string(),
                pkg.max_vuln_score.to_string(),
                pkg.reverse_scorecard_score().to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyreach_core::models::{Package, PackageDetails, ECOSYSTEM_PYPI};

    #[test]
    fn edges_and_metadata_files_are_written_side_by_side() {
        let mut g = Graph::new();
        let root = g.add_vertex(Package::new(PackageDetails::new("root", "0.0.0", ECOSYSTEM_PYPI), None, 0)).index();
        g.set_root(root);
        let a = g.add_vertex(Package::new(PackageDetails::new("a", "1.0", ECOSYSTEM_PYPI), None, 1)).index();
        g.add_edge(root, a);

        let dir = tempfile::tempdir().unwrap();
        let edges_path = dir.path().join("graph.csv");
        export_csv(&g, &edges_path).unwrap();

        let edges_contents = std::fs::read_to_string(&edges_path).unwrap();
        assert!(edges_contents.contains("source,target,color"));
        assert!(edges_contents.contains("root,a,"));

        let metadata_path = dir.path().join("graph.csv.metadata.csv");
        let metadata_contents = std::fs::read_to_string(&metadata_path).unwrap();
        assert!(metadata_contents.contains("id,node_color"));
        assert!(metadata_contents.contains("root,"));
        assert!(metadata_contents.contains("a,"));
    }

    #[test]
    fn vertex_with_no_edges_is_absent_from_metadata() {
        let mut g = Graph::new();
        let root = g.add_vertex(Package::new(PackageDetails::new("root", "0.0.0", ECOSYSTEM_PYPI), None, 0)).index();
        g.set_root(root);

        let dir = tempfile::tempdir().unwrap();
        let edges_path = dir.path().join("graph.csv");
        export_csv(&g, &edges_path).unwrap();

        let metadata_path = dir.path().join("graph.csv.metadata.csv");
        let metadata_contents = std::fs::read_to_string(&metadata_path).unwrap();
        assert_eq!(metadata_contents.trim(), METADATA_HEADER.join(","));
    }
}
