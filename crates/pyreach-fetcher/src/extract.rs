//! Archive extraction for `.tar.gz`, `.whl`, `.egg` and `.zip` distributions,
//! with mandatory path-traversal and symlink-escape defense: no entry may be
//! written outside the destination directory.

use crate::error::{FetchError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Extracts `archive_path` into `dest_dir` (created if missing), dispatching on
/// the archive's extension. Returns an error for any entry that would escape
/// `dest_dir`, whether via a `..` path component or a symlink target.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dest_dir)?;

    let name = archive_path.to_string_lossy();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive_path, dest_dir)
    } else if name.ends_with(".whl") || name.ends_with(".egg") || name.ends_with(".zip") {
        extract_zip(archive_path, dest_dir)
    } else {
        Err(FetchError::UnsupportedExtension(name.to_string()))
    }
}

/// Joins `rel` onto `base`, rejecting any component that would walk above
/// `base` (an absolute path, `..`, or a root prefix). The target need not
/// exist yet, so this cannot rely on `canonicalize`.
fn safe_join(base: &Path, rel: &Path) -> Result<PathBuf> {
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FetchError::PathTraversal(rel.to_path_buf()));
            }
        }
    }
    Ok(out)
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let gz = GzDecoder::new(file);
    let mut archive = tar::Archive::new(gz);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        let dest_path = safe_join(dest_dir, &entry_path)?;

        if let Some(link_name) = entry.link_name()? {
            let link_target = dest_path
                .parent()
                .unwrap_or(dest_dir)
                .join(&link_name);
            if !path_is_contained(&link_target, dest_dir) {
                return Err(FetchError::PathTraversal(link_name.into_owned()));
            }
        }

        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&dest_path)?;
    }

    Ok(())
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(enclosed) = entry.enclosed_name() else {
            return Err(FetchError::PathTraversal(PathBuf::from(entry.name())));
        };
        let dest_path = safe_join(dest_dir, &enclosed)?;

        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest_path)?;
        io::copy(&mut entry, &mut out)?;
    }

    Ok(())
}

/// Lexical containment check (no filesystem access) for a symlink target that
/// may not exist yet.
fn path_is_contained(candidate: &Path, root: &Path) -> bool {
    let mut depth: i32 = 0;
    for component in candidate.strip_prefix(root).unwrap_or(candidate).components() {
        match component {
            Component::ParentDir => depth -= 1,
            Component::Normal(_) => depth += 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_join_rejects_parent_dir_escape() {
        let base = Path::new("/tmp/extract-root");
        let rel = Path::new("../../etc/passwd");
        assert!(safe_join(base, rel).is_err());
    }

    #[test]
    fn safe_join_accepts_nested_path() {
        let base = Path::new("/tmp/extract-root");
        let rel = Path::new("pkg/subdir/file.py");
        let joined = safe_join(base, rel).unwrap();
        assert_eq!(joined, Path::new("/tmp/extract-root/pkg/subdir/file.py"));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_archive(Path::new("package.rar"), dir.path());
        assert!(matches!(result, Err(FetchError::UnsupportedExtension(_))));
    }

    #[test]
    fn path_is_contained_flags_escape() {
        assert!(!path_is_contained(Path::new("/tmp/root/../../etc"), Path::new("/tmp/root")));
        assert!(path_is_contained(Path::new("/tmp/root/a/b"), Path::new("/tmp/root")));
    }
}
