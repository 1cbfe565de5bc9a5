//! Reading documents and writing them back atomically.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use mdfm_core::{FrontmatterError, Result};

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FrontmatterError::FileNotFound(path.to_path_buf()),
        _ => FrontmatterError::Io(e),
    })
}

/// Replace `path` with `updated` unless it equals `original`.
///
/// The new content is written to a sibling temp file and renamed over the
/// target, so readers never see a half-written document.
pub fn write_if_changed(path: &Path, original: &str, updated: &str) -> Result<bool> {
    if original == updated {
        debug!(path = %path.display(), "content unchanged, skipping write");
        return Ok(false);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(updated.as_bytes())?;
    tmp.as_file().sync_all()?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions())?;
    }
    tmp.persist(path).map_err(|e| FrontmatterError::Io(e.error))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_missing_file_reports_the_path() {
        let err = read(Path::new("/nonexistent/doc.md")).unwrap_err();
        match err {
            FrontmatterError::FileNotFound(path) => assert_eq!(path, Path::new("/nonexistent/doc.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unchanged_content_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "same").unwrap();
        assert!(!write_if_changed(&path, "same", "same").unwrap());
    }

    #[test]
    fn changed_content_replaces_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "old").unwrap();
        assert!(write_if_changed(&path, "old", "new").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
