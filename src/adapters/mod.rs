//! External collaborators for photopack.
//!
//! This module provides adapters for the systems around the export engine:
//!
//! - [`storage`] - Binary storage (filesystem and in-memory implementations)
//! - [`catalog`] - Project snapshots from the relational store (JSON manifests)
//! - [`authz`] - Export authorization (allow-list)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. Each collaborator is an
//! `async_trait` trait held as `Arc<dyn Trait>` by the export service.
//!
//! ```rust,no_run
//! use photopack::adapters::catalog::{ManifestCatalog, ProjectCatalog};
//! use photopack::domain::ProjectId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ManifestCatalog::new("/srv/photopack/manifests");
//! let snapshot = catalog.load_snapshot(&ProjectId::new("bridge-7")?).await?;
//! println!("{} photos", snapshot.photos.len());
//! # Ok(())
//! # }
//! ```

pub mod authz;
pub mod catalog;
pub mod storage;
