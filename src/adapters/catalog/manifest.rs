//! JSON manifest catalog
//!
//! Reads `<manifest_dir>/<project_id>.json`, an export of the relational
//! store with `photos` and `drawings` arrays.

use super::ProjectCatalog;
use crate::domain::ids::ProjectId;
use crate::domain::photo::ProjectSnapshot;
use crate::domain::{PhotopackError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Catalog reading one JSON manifest per project
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    manifest_dir: PathBuf,
}

impl ManifestCatalog {
    /// Create a new manifest catalog
    pub fn new(manifest_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest_dir: manifest_dir.into(),
        }
    }

    /// Path of a project's manifest
    pub fn manifest_path(&self, project_id: &ProjectId) -> PathBuf {
        self.manifest_dir.join(format!("{project_id}.json"))
    }
}

#[async_trait]
impl ProjectCatalog for ManifestCatalog {
    async fn load_snapshot(&self, project_id: &ProjectId) -> Result<ProjectSnapshot> {
        let path = self.manifest_path(project_id);

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PhotopackError::Catalog(format!(
                    "Project not found: {project_id} (no manifest at {})",
                    path.display()
                ))
            } else {
                PhotopackError::Catalog(format!(
                    "Failed to read manifest {}: {e}",
                    path.display()
                ))
            }
        })?;

        let snapshot: ProjectSnapshot = serde_json::from_str(&contents).map_err(|e| {
            PhotopackError::Catalog(format!("Invalid manifest {}: {e}", path.display()))
        })?;

        tracing::info!(
            project_id = %project_id,
            photos = snapshot.photos.len(),
            drawings = snapshot.drawings.len(),
            "Loaded project snapshot"
        );

        Ok(snapshot)
    }
}
