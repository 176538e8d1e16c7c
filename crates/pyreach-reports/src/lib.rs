//! Reporter: terminal vulnerability/hygiene tables plus DOT and CSV graph
//! exporters, given an already-reduced-and-propagated graph and its
//! already-propagated pre-reduction counterpart.

pub mod colors;
pub mod csv_export;
pub mod error;
pub mod tables;

pub use error::{ReportError, Result};
pub use pyreach_graph::dot::to_dot;

use std::path::Path;

/// Writes the reduced graph as a standard DOT digraph dump.
pub fn export_dot(graph: &pyreach_graph::Graph, path: &Path) -> Result<()> {
    std::fs::write(path, to_dot(graph))?;
    Ok(())
}

/// Writes the reduced graph's edges and metadata CSV files.
pub fn export_csv(graph: &pyreach_graph::Graph, path: &Path) -> Result<()> {
    csv_export::export_csv(graph, path)
}

/// Prints both the vulnerability table and the low-hygiene report to stdout.
pub fn print_reports(reduced: &pyreach_graph::Graph, original: &pyreach_graph::Graph) {
    print!("{}", tables::vulnerability_table(reduced, original));
    print!("{}", tables::low_hygiene_report(reduced, original));
}
