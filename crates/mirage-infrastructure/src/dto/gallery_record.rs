//! Gallery record DTO.

use chrono::{DateTime, Utc};
use mirage_core::error::{MirageError, Result};
use mirage_core::gallery::GalleryItem;
use mirage_core::image::EncodedImage;
use serde::{Deserialize, Serialize};

pub const GALLERY_SCHEMA_VERSION: u32 = 1;

/// Metadata of one gallery item, stored as `<id>.toml` next to the image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryRecord {
    pub schema_version: u32,
    pub id: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub style_name: String,
    pub prompt: String,
    pub mime_type: String,
    /// Image file name relative to the gallery directory.
    pub image_file: String,
}

impl GalleryRecord {
    pub fn new(
        id: &str,
        created_at: DateTime<Utc>,
        image: &EncodedImage,
        style_name: &str,
        prompt: &str,
    ) -> Self {
        Self {
            schema_version: GALLERY_SCHEMA_VERSION,
            id: id.to_string(),
            created_at: created_at.to_rfc3339(),
            style_name: style_name.to_string(),
            prompt: prompt.to_string(),
            mime_type: image.mime_type().to_string(),
            image_file: format!("{id}.{}", image.file_extension()),
        }
    }

    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                MirageError::persistence(format!(
                    "Invalid created_at '{}' in gallery record {}: {e}",
                    self.created_at, self.id
                ))
            })
    }

    /// Builds the domain item from this record and the image bytes read from disk.
    pub fn into_item(self, bytes: Vec<u8>) -> Result<GalleryItem> {
        let created_at = self.created_at()?;
        Ok(GalleryItem {
            image: EncodedImage::new(self.mime_type, bytes),
            id: self.id,
            created_at,
            style_name: self.style_name,
            prompt: self.prompt,
        })
    }
}
