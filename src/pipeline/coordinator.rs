//! Input discovery for file classification.

use crate::error::Result;
use crate::imaging::is_image_file;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Collect input files from paths (files and directories).
///
/// Files named explicitly are always kept, since their content decides
/// whether they decode. Directories are searched recursively for files with
/// an image extension, in sorted order.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_image_files_recursive(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect image files from a directory.
fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if is_image_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_recurses_into_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("album");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(nested.join("a.JPG"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![nested.join("a.JPG"), dir.path().join("b.png")]);
    }

    #[test]
    fn test_collect_keeps_explicit_files() {
        let dir = TempDir::new().unwrap();
        let odd = dir.path().join("upload.bin");
        std::fs::write(&odd, b"").unwrap();

        let files = collect_input_files(std::slice::from_ref(&odd)).unwrap();
        assert_eq!(files, vec![odd]);
    }

    #[test]
    fn test_collect_skips_missing_paths() {
        let files = collect_input_files(&[PathBuf::from("/nonexistent/photo.jpg")]).unwrap();
        assert!(files.is_empty());
    }
}
