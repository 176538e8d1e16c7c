pub mod python;

pub use python::{locate_manifest, parse_manifest, ManifestKind};
