//! Domain models and types for photopack.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ProjectId`], [`PhotoId`], [`DrawingId`], [`JobId`])
//! - **Domain models** ([`ClassifiedPhoto`], [`ClassifiedDrawing`], [`ProjectSnapshot`])
//! - **Error types** ([`PhotopackError`], [`NamingError`], [`StorageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use photopack::domain::{ClassifiedPhoto, Classification};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let photo = ClassifiedPhoto::builder()
//!     .id("photo-1")
//!     .binary_ref("site/IMG_0001.jpg")
//!     .classification(Classification::new("工事", "施工状況写真"))
//!     .title("Rebar placement")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod photo;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{NamingError, PhotopackError, StorageError};
pub use ids::{BinaryRef, DrawingId, JobId, PhotoId, Principal, ProjectId};
pub use photo::{
    Classification, ClassifiedDrawing, ClassifiedPhoto, ClassifiedPhotoBuilder,
    GeodeticLocation, ProjectSnapshot,
};
pub use result::Result;
