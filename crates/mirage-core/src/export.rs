//! Manual local-save fallback.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;
use crate::image::EncodedImage;

/// Saves an image directly on the kiosk, without any remote service.
#[async_trait]
pub trait ImageExporter: Send + Sync {
    /// Writes `image` using `file_stem` plus the image's extension.
    ///
    /// Returns the path written.
    async fn export(&self, image: &EncodedImage, file_stem: &str) -> Result<PathBuf>;
}
