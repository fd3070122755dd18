//! Package metadata document
//!
//! The metadata document describes every delivered photo: one common-info
//! record plus one record per photo entry, in sequence order. Building it is
//! a pure transform of the folder plan and the project snapshot; [`xml`]
//! serializes it.

pub mod xml;

use crate::config::PackageConfig;
use crate::core::assembly::FolderPlan;
use crate::domain::photo::{ClassifiedPhoto, GeodeticLocation, ProjectSnapshot};
use crate::domain::{PhotopackError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Textual date format used in the metadata document
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Common-info record of the metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonInfo {
    /// Standard version tag
    pub standard_version: String,
    /// Metadata document file name
    pub metadata_file: String,
    /// Photo-files subfolder name
    pub photo_folder: String,
    /// Drawing-files subfolder name, present only when drawings exist
    pub drawing_folder: Option<String>,
    /// Delivery names placed in the drawing subfolder
    pub drawing_file_names: Vec<String>,
    /// Generating software name
    pub software_name: String,
    /// Generating software version
    pub software_version: String,
}

/// Per-photo metadata record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Sequence number of the photo
    pub sequence: u32,
    /// Delivery name of the photo
    pub file_name: String,
    /// Major category
    pub major_category: String,
    /// Photo category
    pub category: String,
    /// Construction type code
    pub construction_type: Option<String>,
    /// Work type code
    pub work_type: Option<String>,
    /// Detail type code
    pub detail_type: Option<String>,
    /// Photo title
    pub title: String,
    /// Free-text shooting location
    pub shooting_location: Option<String>,
    /// Shooting date as `YYYY-MM-DD`
    pub shooting_date: Option<String>,
    /// Representative photo flag
    pub is_representative: bool,
    /// Submission-frequency photo flag
    pub is_submission_frequency_photo: bool,
    /// Delivery name of the linked drawing, or the raw drawing id when unresolved
    pub linked_drawing: Option<String>,
    /// Geodetic location
    pub location: Option<GeodeticLocation>,
}

/// Structured record set describing a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadataDocument {
    /// Common-info record
    pub common: CommonInfo,
    /// Photo records in sequence order
    pub photos: Vec<PhotoRecord>,
}

/// Builds [`PackageMetadataDocument`]s
///
/// No I/O happens here; building twice from the same input gives equal
/// documents.
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    standard_version: String,
    software_name: String,
    software_version: String,
}

impl MetadataBuilder {
    /// Creates a builder with an explicit generator identity
    pub fn new(
        standard_version: impl Into<String>,
        software_name: impl Into<String>,
        software_version: impl Into<String>,
    ) -> Self {
        Self {
            standard_version: standard_version.into(),
            software_name: software_name.into(),
            software_version: software_version.into(),
        }
    }

    /// Creates a builder from package configuration
    pub fn from_config(config: &PackageConfig) -> Self {
        Self::new(
            &config.standard_version,
            &config.software_name,
            &config.software_version,
        )
    }

    /// Builds the document for a folder plan
    ///
    /// # Errors
    ///
    /// Returns [`PhotopackError::Metadata`] if a photo entry has no source
    /// photo in the snapshot or the snapshot repeats an ID.
    pub fn build(
        &self,
        plan: &FolderPlan,
        snapshot: &ProjectSnapshot,
    ) -> Result<PackageMetadataDocument> {
        if let Some(id) = snapshot.first_duplicate_id() {
            return Err(PhotopackError::Metadata(format!(
                "Cannot resolve records for repeated ID {id}"
            )));
        }
        let by_id: HashMap<&str, &ClassifiedPhoto> = snapshot
            .photos
            .iter()
            .map(|photo| (photo.id.as_str(), photo))
            .collect();

        let common = CommonInfo {
            standard_version: self.standard_version.clone(),
            metadata_file: plan.layout.metadata_file.clone(),
            photo_folder: plan.layout.photo_folder.clone(),
            drawing_folder: plan
                .has_drawings()
                .then(|| plan.layout.drawing_folder.clone()),
            drawing_file_names: plan
                .drawings
                .iter()
                .map(|entry| entry.delivery_name.clone())
                .collect(),
            software_name: self.software_name.clone(),
            software_version: self.software_version.clone(),
        };

        let mut photos = Vec::with_capacity(plan.photos.len());
        for entry in &plan.photos {
            let photo = by_id.get(entry.source_id.as_str()).ok_or_else(|| {
                PhotopackError::Metadata(format!(
                    "photo {} assigned to {} is missing from the snapshot",
                    entry.source_id, entry.delivery_name
                ))
            })?;

            let classification = &photo.classification;
            photos.push(PhotoRecord {
                sequence: entry.sequence,
                file_name: entry.delivery_name.clone(),
                major_category: classification.major_category.clone(),
                category: classification.category.clone(),
                construction_type: classification.construction_type.clone(),
                work_type: classification.work_type.clone(),
                detail_type: classification.detail_type.clone(),
                title: photo.title.clone(),
                shooting_location: photo.shooting_location.clone(),
                shooting_date: photo
                    .shooting_date
                    .map(|date| date.format(DATE_FORMAT).to_string()),
                is_representative: photo.is_representative,
                is_submission_frequency_photo: photo.is_submission_frequency_photo,
                linked_drawing: photo.drawing_ref.as_ref().map(|drawing_id| {
                    plan.drawing_name_for(drawing_id)
                        .map(str::to_string)
                        .unwrap_or_else(|| drawing_id.to_string())
                }),
                location: photo.location.clone(),
            });
        }

        Ok(PackageMetadataDocument { common, photos })
    }
}
