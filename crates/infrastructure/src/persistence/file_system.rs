//! Real file system implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use replay_application::ports::{FileSystem, FileSystemError};
use tokio::fs;

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn map_io(path: &Path, e: std::io::Error) -> FileSystemError {
    match e.kind() {
        ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        _ => FileSystemError::Io(e),
    }
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| map_io(path, e))
    }

    async fn read_file_string(&self, path: &Path) -> Result<String, FileSystemError> {
        fs::read_to_string(path).await.map_err(|e| map_io(path, e))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| map_io(parent, e))?;
        }
        fs::write(path, contents).await.map_err(|e| map_io(path, e))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::create_dir_all(path).await.map_err(|e| map_io(path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::rename(from, to).await.map_err(|e| map_io(from, e))
    }

    async fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_file())
    }

    async fn file_size(&self, path: &Path) -> Result<u64, FileSystemError> {
        fs::metadata(path)
            .await
            .map(|m| m.len())
            .map_err(|e| map_io(path, e))
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path).await.map_err(|e| map_io(path, e))?;

        while let Some(entry) = dir.next_entry().await? {
            entries.push(entry.path());
        }

        entries.sort(); // Deterministic ordering
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parents_and_reads_back() {
        let temp = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let path = temp.path().join("nested/dir/fixture.json");

        fs.write_file(&path, b"{}").await.unwrap();

        assert!(fs.is_file(&path).await);
        assert_eq!(fs.read_file_string(&path).await.unwrap(), "{}");
        assert_eq!(fs.file_size(&path).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let path = temp.path().join("absent.png");

        assert!(fs.read_file(&path).await.unwrap_err().is_not_found());
        assert!(fs.file_size(&path).await.unwrap_err().is_not_found());
        assert!(!fs.is_file(&path).await);
    }

    #[tokio::test]
    async fn test_rename_replaces_destination() {
        let temp = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let staged = temp.path().join("abc");
        let pending = temp.path().join("abc.1.tmp");
        fs.write_file(&staged, b"short").await.unwrap();
        fs.write_file(&pending, b"complete image").await.unwrap();

        fs.rename(&pending, &staged).await.unwrap();

        assert_eq!(fs.read_file(&staged).await.unwrap(), b"complete image");
        assert!(!fs.is_file(&pending).await);
    }

    #[tokio::test]
    async fn test_read_dir_is_sorted() {
        let temp = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        for name in ["b.json", "a.json", "c.png"] {
            fs.write_file(&temp.path().join(name), b"").await.unwrap();
        }

        let names: Vec<String> = fs
            .read_dir(temp.path())
            .await
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "c.png"]);
    }
}
