//! Gallery item domain model.

use chrono::{DateTime, Utc};

use crate::image::EncodedImage;

/// A durably stored generated portrait.
///
/// Created exactly once per successful generation and never modified
/// afterwards; only the artifact store creates or deletes items.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Creation timestamp, used for newest-first ordering.
    pub created_at: DateTime<Utc>,
    /// The generated image.
    pub image: EncodedImage,
    /// Display name of the style that produced it.
    pub style_name: String,
    /// The exact instruction sent to the provider.
    pub prompt: String,
}

impl GalleryItem {
    /// File stem used when the item is exported for download.
    pub fn export_stem(&self) -> String {
        format!("mirage-{}", self.id)
    }
}
