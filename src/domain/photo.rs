//! Classified photo and drawing domain models
//!
//! These are read-only snapshots taken from the relational store when an
//! export job starts. The engine never mutates them.

use super::ids::{BinaryRef, DrawingId, PhotoId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Classification of a photo within the delivery standard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Major category (e.g. construction or survey photos)
    #[serde(default)]
    pub major_category: String,

    /// Photo category (e.g. 施工状況写真)
    pub category: String,

    /// Construction type code
    #[serde(default)]
    pub construction_type: Option<String>,

    /// Work type code
    #[serde(default)]
    pub work_type: Option<String>,

    /// Detail type code
    #[serde(default)]
    pub detail_type: Option<String>,
}

impl Classification {
    /// Creates a classification with only a category
    pub fn new(major_category: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            major_category: major_category.into(),
            category: category.into(),
            ..Self::default()
        }
    }
}

/// Geodetic location attached to a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeodeticLocation {
    /// Datum tag (e.g. "JGD2011")
    pub datum: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// A classified photo ready for delivery
///
/// # Examples
///
/// ```
/// use photopack::domain::photo::{ClassifiedPhoto, Classification};
/// use chrono::NaiveDate;
///
/// let photo = ClassifiedPhoto::builder()
///     .id("photo-1")
///     .binary_ref("site/IMG_0001.jpg")
///     .classification(Classification::new("工事", "施工状況写真"))
///     .title("Rebar placement, pier 2")
///     .shooting_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
///     .build()
///     .unwrap();
/// assert!(!photo.is_representative);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedPhoto {
    /// Identity in the relational store
    pub id: PhotoId,

    /// Reference to the image binary
    pub binary_ref: BinaryRef,

    /// Classification codes
    pub classification: Classification,

    /// Human title
    #[serde(default)]
    pub title: String,

    /// Free-text shooting location
    #[serde(default)]
    pub shooting_location: Option<String>,

    /// Shooting date
    #[serde(default)]
    pub shooting_date: Option<NaiveDate>,

    /// Representative photo flag
    #[serde(default)]
    pub is_representative: bool,

    /// Submission-frequency photo flag
    #[serde(default)]
    pub is_submission_frequency_photo: bool,

    /// Drawing this photo refers to
    #[serde(default)]
    pub drawing_ref: Option<DrawingId>,

    /// Geodetic location
    #[serde(default)]
    pub location: Option<GeodeticLocation>,
}

impl ClassifiedPhoto {
    /// Creates a new builder for constructing a ClassifiedPhoto
    pub fn builder() -> ClassifiedPhotoBuilder {
        ClassifiedPhotoBuilder::default()
    }
}

/// Builder for [`ClassifiedPhoto`]
#[derive(Debug, Default)]
pub struct ClassifiedPhotoBuilder {
    id: Option<String>,
    binary_ref: Option<String>,
    classification: Option<Classification>,
    title: String,
    shooting_location: Option<String>,
    shooting_date: Option<NaiveDate>,
    is_representative: bool,
    is_submission_frequency_photo: bool,
    drawing_ref: Option<String>,
    location: Option<GeodeticLocation>,
}

impl ClassifiedPhotoBuilder {
    /// Sets the photo ID
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the binary reference
    pub fn binary_ref(mut self, binary_ref: impl Into<String>) -> Self {
        self.binary_ref = Some(binary_ref.into());
        self
    }

    /// Sets the classification
    pub fn classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Sets the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the shooting location
    pub fn shooting_location(mut self, location: impl Into<String>) -> Self {
        self.shooting_location = Some(location.into());
        self
    }

    /// Sets the shooting date
    pub fn shooting_date(mut self, date: NaiveDate) -> Self {
        self.shooting_date = Some(date);
        self
    }

    /// Marks the photo as representative
    pub fn representative(mut self, value: bool) -> Self {
        self.is_representative = value;
        self
    }

    /// Marks the photo as a submission-frequency photo
    pub fn submission_frequency(mut self, value: bool) -> Self {
        self.is_submission_frequency_photo = value;
        self
    }

    /// Links the photo to a drawing
    pub fn drawing_ref(mut self, drawing_id: impl Into<String>) -> Self {
        self.drawing_ref = Some(drawing_id.into());
        self
    }

    /// Sets the geodetic location
    pub fn location(mut self, location: GeodeticLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Builds the ClassifiedPhoto
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or an identifier is invalid
    pub fn build(self) -> Result<ClassifiedPhoto, String> {
        Ok(ClassifiedPhoto {
            id: PhotoId::new(self.id.ok_or("id is required")?)?,
            binary_ref: BinaryRef::new(self.binary_ref.ok_or("binary_ref is required")?)?,
            classification: self.classification.ok_or("classification is required")?,
            title: self.title,
            shooting_location: self.shooting_location,
            shooting_date: self.shooting_date,
            is_representative: self.is_representative,
            is_submission_frequency_photo: self.is_submission_frequency_photo,
            drawing_ref: self.drawing_ref.map(DrawingId::new).transpose()?,
            location: self.location,
        })
    }
}

/// A classified drawing referenced by photos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDrawing {
    /// Identity in the relational store
    pub id: DrawingId,

    /// Reference to the drawing binary
    pub binary_ref: BinaryRef,

    /// Optional title
    #[serde(default)]
    pub title: Option<String>,
}

impl ClassifiedDrawing {
    /// Creates a new drawing
    pub fn new(id: impl Into<String>, binary_ref: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            id: DrawingId::new(id)?,
            binary_ref: BinaryRef::new(binary_ref)?,
            title: None,
        })
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Immutable project snapshot handed to one export job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Photos in store order
    #[serde(default)]
    pub photos: Vec<ClassifiedPhoto>,

    /// Drawings in store order
    #[serde(default)]
    pub drawings: Vec<ClassifiedDrawing>,
}

impl ProjectSnapshot {
    /// Creates a snapshot from photos and drawings
    pub fn new(photos: Vec<ClassifiedPhoto>, drawings: Vec<ClassifiedDrawing>) -> Self {
        Self { photos, drawings }
    }

    /// Total number of files the package will contain, excluding the metadata document
    pub fn file_count(&self) -> usize {
        self.photos.len() + self.drawings.len()
    }

    /// Looks up a photo by ID
    pub fn photo(&self, id: &PhotoId) -> Option<&ClassifiedPhoto> {
        self.photos.iter().find(|p| &p.id == id)
    }

    /// First photo or drawing ID listed twice within its own category
    ///
    /// Sequence names, metadata and drawing references all resolve files
    /// by ID, so a package cannot be built from a snapshot that repeats one.
    pub fn first_duplicate_id(&self) -> Option<&str> {
        let mut photos = HashSet::new();
        let photo_dup = self
            .photos
            .iter()
            .map(|p| p.id.as_str())
            .find(|id| !photos.insert(*id));

        photo_dup.or_else(|| {
            let mut drawings = HashSet::new();
            self.drawings
                .iter()
                .map(|d| d.id.as_str())
                .find(|id| !drawings.insert(*id))
        })
    }
}
