//! Offline verification of delivered packages
//!
//! This module checks an expanded package after the fact: delivery-name
//! grammar, sequence contiguity, the metadata document and, optionally,
//! file checksums against a job's copy manifest.

pub mod checksum;
pub mod report;
pub mod verify;

pub use report::{VerificationFailure, VerificationReport};
pub use verify::Verifier;
