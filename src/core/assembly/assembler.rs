//! Assembler turning a project snapshot into a folder plan

use super::{DeliveryFileEntry, EntryKind, FolderPlan, PackageLayout};
use crate::core::naming::{SequenceNameGenerator, MAX_SEQUENCE};
use crate::domain::photo::{ClassifiedPhoto, ProjectSnapshot};
use crate::domain::{PhotopackError, Result};
use std::cmp::Ordering;

/// Folder structure assembler
///
/// Photos are ordered by category rank, then shooting date ascending
/// (undated last), then input order. Drawings keep input order.
#[derive(Debug, Clone)]
pub struct Assembler {
    layout: PackageLayout,
    category_order: Vec<String>,
    default_photo_extension: String,
}

impl Assembler {
    /// Creates an assembler
    ///
    /// # Arguments
    ///
    /// * `layout` - Folder names of the package
    /// * `category_order` - Categories in delivery order; unknown categories sort after these by text
    /// * `default_photo_extension` - Extension for photos whose binary reference has none
    pub fn new(
        layout: PackageLayout,
        category_order: Vec<String>,
        default_photo_extension: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            category_order,
            default_photo_extension: default_photo_extension.into(),
        }
    }

    /// Builds the folder plan, drawing names from `generator`
    ///
    /// # Errors
    ///
    /// Fails before generating any name if either category would exhaust
    /// the sequence range, and fails if a drawing has no supported extension.
    pub fn assemble(
        &self,
        snapshot: &ProjectSnapshot,
        generator: &mut SequenceNameGenerator,
    ) -> Result<FolderPlan> {
        check_capacity("photo", generator.peek_photo_sequence(), snapshot.photos.len())?;
        check_capacity(
            "drawing",
            generator.peek_drawing_sequence(),
            snapshot.drawings.len(),
        )?;
        if let Some(id) = snapshot.first_duplicate_id() {
            return Err(PhotopackError::Assembly(format!(
                "file ID {id} appears more than once in the snapshot"
            )));
        }

        let mut drawings = Vec::with_capacity(snapshot.drawings.len());
        for drawing in &snapshot.drawings {
            let extension = drawing.binary_ref.extension().ok_or_else(|| {
                PhotopackError::Assembly(format!(
                    "drawing {} has no file extension: {}",
                    drawing.id, drawing.binary_ref
                ))
            })?;
            let sequence = generator.peek_drawing_sequence();
            let delivery_name = generator.next_drawing_file_name(extension)?;
            drawings.push(DeliveryFileEntry {
                kind: EntryKind::Drawing,
                source_id: drawing.id.to_string(),
                source_ref: drawing.binary_ref.clone(),
                sequence,
                relative_path: format!("{}/{}", self.layout.drawing_folder, delivery_name),
                delivery_name,
            });
        }

        let mut photos = Vec::with_capacity(snapshot.photos.len());
        for photo in self.order_photos(&snapshot.photos) {
            let extension = photo
                .binary_ref
                .extension()
                .unwrap_or(self.default_photo_extension.as_str());
            let sequence = generator.peek_photo_sequence();
            let delivery_name = generator.next_photo_file_name_with_extension(extension)?;
            photos.push(DeliveryFileEntry {
                kind: EntryKind::Photo,
                source_id: photo.id.to_string(),
                source_ref: photo.binary_ref.clone(),
                sequence,
                relative_path: format!("{}/{}", self.layout.photo_folder, delivery_name),
                delivery_name,
            });
        }

        tracing::debug!(
            photos = photos.len(),
            drawings = drawings.len(),
            "Assembled folder plan"
        );

        Ok(FolderPlan {
            layout: self.layout.clone(),
            photos,
            drawings,
        })
    }

    /// Photos in delivery order
    pub fn order_photos<'a>(&self, photos: &'a [ClassifiedPhoto]) -> Vec<&'a ClassifiedPhoto> {
        let mut indexed: Vec<(usize, &ClassifiedPhoto)> = photos.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            self.compare_category(&a.classification.category, &b.classification.category)
                .then_with(|| compare_dates(a, b))
                .then_with(|| ia.cmp(ib))
        });
        indexed.into_iter().map(|(_, photo)| photo).collect()
    }

    fn compare_category(&self, a: &str, b: &str) -> Ordering {
        let rank = |category: &str| {
            self.category_order
                .iter()
                .position(|known| known == category)
                .unwrap_or(self.category_order.len())
        };
        rank(a).cmp(&rank(b)).then_with(|| {
            // Only unknown categories share a rank with a different name.
            if rank(a) == self.category_order.len() {
                a.cmp(b)
            } else {
                Ordering::Equal
            }
        })
    }
}

fn compare_dates(a: &ClassifiedPhoto, b: &ClassifiedPhoto) -> Ordering {
    match (a.shooting_date, b.shooting_date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn check_capacity(category: &str, next_sequence: u32, count: usize) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let last = u64::from(next_sequence) + count as u64 - 1;
    if last > u64::from(MAX_SEQUENCE) {
        return Err(PhotopackError::Assembly(format!(
            "{count} {category} files would exceed the sequence limit of {MAX_SEQUENCE}"
        )));
    }
    Ok(())
}
