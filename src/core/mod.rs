//! Core business logic for photopack.
//!
//! This module contains the delivery-package pipeline and its building blocks.
//!
//! # Modules
//!
//! - [`naming`] - Delivery file names and the per-job sequence generator
//! - [`assembly`] - Folder plan for a project snapshot
//! - [`metadata`] - Package metadata document and its XML form
//! - [`validation`] - Rule registry and validation report
//! - [`export`] - Export job state machine, coordinator and service
//! - [`state`] - Persisted job status snapshots
//! - [`verification`] - Offline checks of a delivered package
//!
//! # Export Workflow
//!
//! One export job walks these steps, strictly forward:
//!
//! 1. **preparing**: Check configuration and sequence capacity
//! 2. **creating-folders**: Assemble the folder plan and create the staging tree
//! 3. **copying-photos**: Stream every binary into place, hashing as it goes
//! 4. **generating-xml**: Build and write the metadata document
//! 5. **validating**: Run the validation engine and apply the acceptance policy
//! 6. **creating-archive**: Move the tree into place or pack it into a zip
//! 7. **completed**
//!
//! Any step may end the job in **failed** instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use photopack::config::load_config;
//! use photopack::core::export::ExportService;
//! use photopack::domain::{Principal, ProjectId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("photopack.toml")?;
//! let service = ExportService::from_config(config);
//!
//! let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
//! let status = service
//!     .request_export(Principal::new("alice")?, ProjectId::new("bridge-7")?, cancel_rx)
//!     .await?;
//!
//! println!("{}", status.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod assembly;
pub mod export;
pub mod metadata;
pub mod naming;
pub mod state;
pub mod validation;
pub mod verification;
