//! File discovery for finding submission candidates in directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::types::ContainerKind;

/// Discovers `.png` and `.psd` files.
pub struct FileDiscovery;

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Discover all checkable files at a path.
    ///
    /// An explicit file path is always returned, whatever its extension, so
    /// the dispatcher can reject it with a report. Directories are walked
    /// recursively and only supported extensions are kept.
    pub fn discover(path: &Path) -> Vec<DiscoveredFile> {
        if path.is_file() {
            return match std::fs::metadata(path) {
                Ok(meta) => vec![DiscoveredFile {
                    path: path.to_path_buf(),
                    size: meta.len(),
                }],
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot stat file");
                    vec![]
                }
            };
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry_path.is_file() && Self::is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ContainerKind::from_extension(&ext.to_lowercase()))
            .is_some()
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        assert!(FileDiscovery::is_supported(Path::new("cover.png")));
        assert!(FileDiscovery::is_supported(Path::new("cover.PNG")));
        assert!(FileDiscovery::is_supported(Path::new("cover.psd")));
        assert!(!FileDiscovery::is_supported(Path::new("cover.gif")));
        assert!(!FileDiscovery::is_supported(Path::new("cover.jpg")));
        assert!(!FileDiscovery::is_supported(Path::new("cover")));
    }

    #[test]
    fn test_discover_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.psd"), b"x").unwrap();
        std::fs::write(dir.path().join("a.png"), b"xy").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"z").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/c.PNG"), b"xyz").unwrap();

        let files = FileDiscovery::discover(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.psd", "c.PNG"]);
        assert_eq!(FileDiscovery::total_size(&files), 6);
    }

    #[test]
    fn test_explicit_file_kept_even_if_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, b"GIF89a").unwrap();
        let files = FileDiscovery::discover(&path);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 6);
    }
}
