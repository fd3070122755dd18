//! Folder structure assembly
//!
//! Maps a project snapshot onto the canonical package layout: one root
//! folder holding the metadata document, a photo-files subfolder and, when
//! drawings exist, a drawing-files subfolder. Every photo and drawing becomes
//! exactly one [`DeliveryFileEntry`].

pub mod assembler;

pub use assembler::Assembler;

use crate::config::PackageConfig;
use crate::domain::ids::{BinaryRef, DrawingId};
use serde::{Deserialize, Serialize};

/// Folder and file names of a delivery package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLayout {
    /// Root folder name
    pub root_folder: String,
    /// Metadata document file name, at the root
    pub metadata_file: String,
    /// Photo-files subfolder
    pub photo_folder: String,
    /// Drawing-files subfolder
    pub drawing_folder: String,
}

impl PackageLayout {
    /// Builds the layout from package configuration
    pub fn from_config(config: &PackageConfig) -> Self {
        Self {
            root_folder: config.root_folder.clone(),
            metadata_file: config.metadata_file.clone(),
            photo_folder: config.photo_folder.clone(),
            drawing_folder: config.drawing_folder.clone(),
        }
    }
}

impl Default for PackageLayout {
    fn default() -> Self {
        Self::from_config(&PackageConfig::default())
    }
}

/// Category of a delivery file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Photo file (`P` prefix)
    Photo,
    /// Drawing file (`D` prefix)
    Drawing,
}

/// One classified entity paired with its delivery name and package path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFileEntry {
    /// Photo or drawing
    pub kind: EntryKind,
    /// Identity of the source photo or drawing
    pub source_id: String,
    /// Binary the file is copied from
    pub source_ref: BinaryRef,
    /// Sequence number within the entry's category
    pub sequence: u32,
    /// Generated delivery name
    pub delivery_name: String,
    /// Path relative to the package root folder
    pub relative_path: String,
}

/// The assembled package layout for one job
///
/// Entry order is final: sequence numbers are decided here, before any
/// binary is transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPlan {
    /// Folder names
    pub layout: PackageLayout,
    /// Photo entries in sequence order
    pub photos: Vec<DeliveryFileEntry>,
    /// Drawing entries in sequence order
    pub drawings: Vec<DeliveryFileEntry>,
}

impl FolderPlan {
    /// All entries, photos first
    pub fn entries(&self) -> impl Iterator<Item = &DeliveryFileEntry> {
        self.photos.iter().chain(self.drawings.iter())
    }

    /// Number of files to copy
    pub fn total_files(&self) -> usize {
        self.photos.len() + self.drawings.len()
    }

    /// Whether the package carries a drawing-files subfolder
    pub fn has_drawings(&self) -> bool {
        !self.drawings.is_empty()
    }

    /// Delivery name assigned to a drawing
    pub fn drawing_name_for(&self, id: &DrawingId) -> Option<&str> {
        self.drawings
            .iter()
            .find(|entry| entry.source_id == id.as_str())
            .map(|entry| entry.delivery_name.as_str())
    }
}
