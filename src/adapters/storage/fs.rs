//! Filesystem binary storage

use super::{BinaryReader, BinaryStorage};
use crate::domain::ids::BinaryRef;
use crate::domain::StorageError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Binary storage rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsBinaryStorage {
    root: PathBuf,
}

impl FsBinaryStorage {
    /// Create a new filesystem storage
    ///
    /// # Arguments
    ///
    /// * `root` - Directory binary references resolve against
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a reference to a path under the root
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidReference`] for references that would
    /// leave the root.
    pub fn resolve(&self, reference: &BinaryRef) -> Result<PathBuf, StorageError> {
        let relative = Path::new(reference.as_str());
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(StorageError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BinaryStorage for FsBinaryStorage {
    async fn open(&self, reference: &BinaryRef) -> Result<BinaryReader, StorageError> {
        let path = self.resolve(reference)?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| StorageError::from_io(format!("open {}", path.display()), &e))?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_open_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("site")).unwrap();
        std::fs::write(dir.path().join("site/a.jpg"), b"jpeg-bytes").unwrap();

        let storage = FsBinaryStorage::new(dir.path());
        let mut reader = storage
            .open(&BinaryRef::new("site/a.jpg").unwrap())
            .await
            .unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_open_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = FsBinaryStorage::new(dir.path());
        let result = storage.open(&BinaryRef::new("missing.jpg").unwrap()).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_resolve_stays_under_root() {
        let storage = FsBinaryStorage::new("/srv/binaries");
        let path = storage.resolve(&BinaryRef::new("a/b.jpg").unwrap()).unwrap();
        assert_eq!(path, PathBuf::from("/srv/binaries/a/b.jpg"));
    }
}
