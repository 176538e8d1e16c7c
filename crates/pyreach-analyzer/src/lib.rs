//! Source Analyzer: static imported/exported module-set extraction for a Python
//! source tree, backed by `tree-sitter`/`tree-sitter-python` rather than shelling
//! out to a Python AST library.

pub mod error;

use error::{AnalyzerError, Result};
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Parser};
use walkdir::WalkDir;

const SKIP_DIR_NAMES: [&str; 2] = [".git", "test"];

/// Enumerates `.py` files under `source_dir` (excluding `.git`/`test` directories)
/// and returns the union of top-level module names referenced in import
/// statements. A parser failure on a single file is logged and treated as an
/// empty contribution from that file; it does not fail the whole call.
pub fn imported_modules(source_dir: &Path) -> Result<HashSet<String>> {
    let mut modules = HashSet::new();

    for entry in WalkDir::new(source_dir)
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() {
                let name = e.file_name().to_str().unwrap_or("");
                !SKIP_DIR_NAMES.contains(&name)
            } else {
                true
            }
        })
        .filter_map(|e| e.ok())
    {
        if !is_python_file(entry.path()) {
            continue;
        }
        match imports_in_file(entry.path()) {
            Ok(found) => modules.extend(found),
            Err(e) => tracing::debug!("failed to parse {:?}: {}", entry.path(), e),
        }
    }

    Ok(modules)
}

/// Returns the set of top-level module names the package publishes: top-level
/// `.py` files (other than `__init__`/`setup`) and top-level directories that
/// contain an `__init__.py`.
pub fn exported_modules(source_dir: &Path) -> Result<HashSet<String>> {
    let mut modules = HashSet::new();

    let entries = std::fs::read_dir(source_dir)?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_file() && is_python_file(&path) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem != "__init__" && stem != "setup" {
                    modules.insert(stem.to_string());
                }
            }
        } else if file_type.is_dir() {
            if path.join("__init__.py").exists() {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    modules.insert(name.to_string());
                }
            }
        }
    }

    Ok(modules)
}

fn is_python_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("py")
}

fn imports_in_file(path: &Path) -> Result<HashSet<String>> {
    let source = std::fs::read_to_string(path)?;
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .expect("tree-sitter-python grammar is always loadable");
    let tree = parser.parse(&source, None).ok_or_else(|| AnalyzerError::Parse {
        path: path.display().to_string(),
        message: "tree-sitter returned no parse tree".to_string(),
    })?;

    let mut modules = HashSet::new();
    walk_imports(tree.root_node(), source.as_bytes(), &mut modules);
    Ok(modules)
}

fn walk_imports(node: Node, source: &[u8], modules: &mut HashSet<String>) {
    match node.kind() {
        "import_statement" => {
            for i in 0..node.child_count() {
                if let Some(child) = node.child(i) {
                    collect_dotted_name_top_level(child, source, modules);
                }
            }
        }
        "import_from_statement" => {
            // `from X import ...` — skip relative imports (`from . import x`,
            // `from .foo import x`); these resolve within the same package, not
            // to an external top-level dependency.
            let has_relative = (0..node.child_count())
                .filter_map(|i| node.child(i))
                .any(|c| c.kind() == "relative_import");
            if !has_relative {
                if let Some(module_node) = node.child_by_field_name("module_name") {
                    collect_dotted_name_top_level(module_node, source, modules);
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_imports(child, source, modules);
    }
}

/// Given a `dotted_name`, `aliased_import`, or `identifier` node, inserts only
/// the first (top-level) segment.
fn collect_dotted_name_top_level(node: Node, source: &[u8], modules: &mut HashSet<String>) {
    match node.kind() {
        "dotted_name" => {
            if let Some(first) = node.child(0) {
                if let Ok(text) = first.utf8_text(source) {
                    modules.insert(text.to_string());
                }
            }
        }
        "aliased_import" => {
            if let Some(name) = node.child_by_field_name("name") {
                collect_dotted_name_top_level(name, source, modules);
            }
        }
        "identifier" => {
            if let Ok(text) = node.utf8_text(source) {
                modules.insert(text.to_string());
            }
        }
        _ => {}
    }
}
