//! Filesystem capability used by the locator, scanner, and snapshot store.
//!
//! All filesystem access goes through this trait so callers can inject a
//! test double and so scan traffic is observable. Only the operations the
//! engine needs are exposed: immediate-children listing, existence checks,
//! and small-blob read/write for the cache snapshot.

use std::io;
use std::path::{Path, PathBuf};

/// Minimal filesystem surface required by the library engine.
pub trait Filesystem: Send + Sync {
    /// List the immediate children of a directory, sorted by path.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Whether the path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read a file's contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write a file's contents, creating parent directories as needed.
    /// Writes are complete-or-nothing; partial content is never visible.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// `std::fs`-backed filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl RealFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for RealFilesystem {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .flatten()
            .map(|e| e.path())
            .collect();
        entries.sort();
        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write atomically so readers never observe a partial blob.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_dir_returns_sorted_children() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("zeta")).unwrap();
        std::fs::create_dir(tmp.path().join("alpha")).unwrap();
        std::fs::write(tmp.path().join("mid.txt"), b"x").unwrap();

        let fs = RealFilesystem::new();
        let children = fs.list_dir(tmp.path()).unwrap();
        let names: Vec<_> = children
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha", "mid.txt", "zeta"]);
    }

    #[test]
    fn write_creates_parents_and_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = RealFilesystem::new();
        let path = tmp.path().join("nested").join("blob.json");

        fs.write(&path, b"{\"ok\":true}").unwrap();
        assert!(fs.is_file(&path));
        assert_eq!(fs.read(&path).unwrap(), b"{\"ok\":true}");

        fs.remove_file(&path).unwrap();
        assert!(!fs.is_file(&path));
    }

    #[test]
    fn list_dir_on_missing_path_errors() {
        let fs = RealFilesystem::new();
        assert!(fs.list_dir(Path::new("/definitely/not/here")).is_err());
    }
}
