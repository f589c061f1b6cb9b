//! Directory exporter: the manual "save to this device" fallback.

use crate::paths::MiragePaths;
use async_trait::async_trait;
use mirage_core::error::{MirageError, Result};
use mirage_core::export::ImageExporter;
use mirage_core::image::EncodedImage;
use std::path::PathBuf;
use tokio::fs;

/// Writes images into a local directory, never overwriting an existing file.
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn from_paths(paths: &MiragePaths) -> Result<Self> {
        Ok(Self::new(paths.exports_dir()?))
    }

    /// First free `<stem>.<ext>`, then `<stem>-2.<ext>`, `<stem>-3.<ext>`, ...
    async fn free_path(&self, stem: &str, ext: &str) -> Result<PathBuf> {
        let mut candidate = self.dir.join(format!("{stem}.{ext}"));
        let mut n = 2;
        while fs::try_exists(&candidate).await? {
            candidate = self.dir.join(format!("{stem}-{n}.{ext}"));
            n += 1;
        }
        Ok(candidate)
    }
}

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "portrait".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ImageExporter for DirectoryExporter {
    async fn export(&self, image: &EncodedImage, file_stem: &str) -> Result<PathBuf> {
        if image.is_empty() {
            return Err(MirageError::invalid_image("Refusing to export an empty image"));
        }
        fs::create_dir_all(&self.dir).await?;

        let path = self
            .free_path(&sanitize_stem(file_stem), image.file_extension())
            .await?;
        fs::write(&path, image.bytes()).await?;

        tracing::info!(path = %path.display(), "Exported image");
        Ok(path)
    }
}
