pub mod text;

use std::fs;
use std::path::Path;

use crate::error::{GlassError, Result};

pub use text::{normalize_whitespace, truncate_with_marker};

/// Ensure the parent directory of a path exists, creating it if necessary.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| GlassError::FileIo {
            operation: "create",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Write file atomically using a temp file and rename.
///
/// Either the new content is fully written or the original file stays unchanged.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GlassError::FileIo {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GlassError::FileIo {
        operation: "rename",
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a file, treating a missing file as `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GlassError::FileIo {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Clamp `value` into `[0, len - 1]`; 0 for empty ranges.
pub fn clamp_index(value: usize, len: usize) -> usize {
    value.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_atomic_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/storage.json");

        write_file_atomic(&path, "{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_read_optional_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_optional(&dir.path().join("absent")).unwrap().is_none());
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(5, 3), 2);
        assert_eq!(clamp_index(1, 3), 1);
        assert_eq!(clamp_index(4, 0), 0);
    }
}
