//! Project catalog collaborator
//!
//! Supplies the classified photo and drawing snapshot for a project. The
//! snapshot is taken once when a job starts and never refreshed.

pub mod manifest;

pub use manifest::ManifestCatalog;

use crate::domain::ids::ProjectId;
use crate::domain::photo::ProjectSnapshot;
use crate::domain::{PhotopackError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Project catalog trait
#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    /// Loads the snapshot of a project
    ///
    /// # Errors
    ///
    /// Returns [`PhotopackError::Catalog`] if the project is unknown or its
    /// data cannot be read.
    async fn load_snapshot(&self, project_id: &ProjectId) -> Result<ProjectSnapshot>;
}

/// Catalog holding snapshots in memory
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    projects: RwLock<HashMap<ProjectId, ProjectSnapshot>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a project snapshot
    pub fn insert(&self, project_id: ProjectId, snapshot: ProjectSnapshot) {
        self.projects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(project_id, snapshot);
    }
}

#[async_trait]
impl ProjectCatalog for MemoryCatalog {
    async fn load_snapshot(&self, project_id: &ProjectId) -> Result<ProjectSnapshot> {
        self.projects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(project_id)
            .cloned()
            .ok_or_else(|| PhotopackError::Catalog(format!("Project not found: {project_id}")))
    }
}
