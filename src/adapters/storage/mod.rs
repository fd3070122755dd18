//! Binary storage collaborator
//!
//! Supplies a readable stream per binary reference. The export pipeline
//! calls it only during the copy step.

pub mod fs;
pub mod memory;

pub use fs::FsBinaryStorage;
pub use memory::MemoryBinaryStorage;

use crate::domain::ids::BinaryRef;
use crate::domain::StorageError;
use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Readable stream of one binary
pub type BinaryReader = Box<dyn AsyncRead + Send + Unpin>;

/// Binary storage trait
///
/// Implementations must classify failures so the copy step can decide
/// whether a retry may help (see [`StorageError::is_transient`]).
#[async_trait]
pub trait BinaryStorage: Send + Sync {
    /// Opens the binary for reading
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the binary does not exist and
    /// [`StorageError::Transient`] for failures worth retrying.
    async fn open(&self, reference: &BinaryRef) -> Result<BinaryReader, StorageError>;
}
