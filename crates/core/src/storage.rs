//! File storage abstraction for image binaries.
//!
//! Image records hold a path locator; the bytes live behind a
//! [`FileStore`]. Deleting a path that does not exist is success, so
//! detaching an image whose file already vanished still removes the
//! record. File writes and record writes are two independent
//! operations: a failure between them leaves either an orphan file or
//! a record pointing at nothing, which is accepted for this
//! regenerable, non-critical data.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::CoreError;

/// Durable file storage addressed by relative path.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` under `path`, creating parent directories.
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), CoreError>;

    /// Whether a file exists at `path`.
    async fn exists(&self, path: &str) -> bool;

    /// Delete the file at `path`. Deleting a missing path is success.
    async fn delete(&self, path: &str) -> Result<(), CoreError>;
}

/// Local-filesystem store rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), CoreError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Internal(format!("create dir {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("write {}: {e}", full.display())))
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    async fn delete(&self, path: &str) -> Result<(), CoreError> {
        let full = self.resolve(path);
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!("delete {}: {e}", full.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_exists_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        store.write("products/a.png", b"bytes").await.unwrap();
        assert!(store.exists("products/a.png").await);

        store.delete("products/a.png").await.unwrap();
        assert!(!store.exists("products/a.png").await);
    }

    #[tokio::test]
    async fn delete_of_missing_path_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        store.delete("products/never-written.png").await.unwrap();
    }
}
