// photopack - Construction photo delivery package engine
// Copyright (c) 2025 photopack Contributors
// Licensed under the MIT License

//! # photopack - Construction photo delivery packages
//!
//! photopack turns a project's classified construction photos and drawings
//! into the regulated electronic delivery package: a fixed folder layout,
//! fixed-grammar file names (`P0000001.JPG`, `D0000001.PDF`) and a metadata
//! document describing every file.
//!
//! ## Architecture
//!
//! photopack follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (naming, assembly, metadata, validation, export)
//! - [`adapters`] - External collaborators (binary storage, project catalog, authorization)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photopack::config::load_config;
//! use photopack::core::export::ExportService;
//! use photopack::domain::{Principal, ProjectId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("photopack.toml")?;
//!     let service = ExportService::from_config(config);
//!
//!     let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
//!     let status = service
//!         .request_export(Principal::new("alice")?, ProjectId::new("bridge-7")?, cancel_rx)
//!         .await?;
//!
//!     println!("{}", status.format_summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Delivery Names
//!
//! Sequence numbers are assigned per job and per category, starting at 1:
//!
//! ```rust
//! use photopack::core::naming::{extract_sequence_number, SequenceNameGenerator};
//!
//! let mut generator = SequenceNameGenerator::new();
//! assert_eq!(generator.next_photo_file_name().unwrap(), "P0000001.JPG");
//! assert_eq!(generator.next_drawing_file_name("pdf").unwrap(), "D0000001.PDF");
//! assert_eq!(extract_sequence_number("P0000042.TIF"), Some(42));
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`] with a [`domain::PhotopackError`];
//! the CLI converts to `anyhow` at its boundary.
//!
//! ## Logging
//!
//! photopack uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(job_id = "…", step = "copying-photos", "Export step started");
//! warn!(file = "P0000003.JPG", attempt = 1, "Retrying copy");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
