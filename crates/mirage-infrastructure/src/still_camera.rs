//! Camera backed by a directory of still frames.
//!
//! An external capture daemon keeps writing the latest frame into a
//! directory; a snapshot picks the newest image file. When the directory has
//! a `user/` or `environment/` subdirectory, that one serves the matching
//! facing.

use async_trait::async_trait;
use mirage_core::camera::{Camera, CameraError, CameraStream, Facing};
use mirage_core::image::EncodedImage;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

pub struct DirectoryStillCamera {
    dir: PathBuf,
}

impl DirectoryStillCamera {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn source_dir(&self, facing: Facing) -> PathBuf {
        let specific = self.dir.join(facing.as_ref());
        if specific.is_dir() {
            specific
        } else {
            self.dir.clone()
        }
    }
}

#[async_trait]
impl Camera for DirectoryStillCamera {
    async fn open_stream(&self, facing: Facing) -> Result<Box<dyn CameraStream>, CameraError> {
        let dir = self.source_dir(facing);
        let metadata = fs::metadata(&dir)
            .await
            .map_err(|e| CameraError::Unavailable(format!("{}: {e}", dir.display())))?;
        if !metadata.is_dir() {
            return Err(CameraError::Unavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        tracing::debug!(dir = %dir.display(), %facing, "Camera stream opened");
        Ok(Box::new(DirectoryStream {
            dir,
            facing,
            open: true,
        }))
    }
}

struct DirectoryStream {
    dir: PathBuf,
    facing: Facing,
    open: bool,
}

fn image_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
}

async fn newest_frame(dir: &Path) -> Result<Option<(PathBuf, String)>, CameraError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| CameraError::Snapshot(e.to_string()))?;

    let mut newest: Option<(SystemTime, PathBuf, String)> = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CameraError::Snapshot(e.to_string()))?
    {
        let path = entry.path();
        let Some(mime) = image_mime(&path) else {
            continue;
        };
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().is_none_or(|(t, _, _)| modified >= *t) {
            newest = Some((modified, path, mime));
        }
    }

    Ok(newest.map(|(_, path, mime)| (path, mime)))
}

#[async_trait]
impl CameraStream for DirectoryStream {
    fn facing(&self) -> Facing {
        self.facing
    }

    async fn snapshot(&mut self) -> Result<EncodedImage, CameraError> {
        if !self.open {
            return Err(CameraError::Closed);
        }

        let (path, mime) = newest_frame(&self.dir)
            .await?
            .ok_or_else(|| CameraError::Snapshot(format!("No frame in {}", self.dir.display())))?;
        let bytes = fs::read(&path)
            .await
            .map_err(|e| CameraError::Snapshot(format!("{}: {e}", path.display())))?;

        Ok(EncodedImage::new(mime, bytes))
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            tracing::debug!(dir = %self.dir.display(), "Camera stream closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_dir_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let camera = DirectoryStillCamera::new(temp_dir.path().join("nope"));

        let err = camera.open_stream(Facing::User).await.err().unwrap();
        assert!(matches!(err, CameraError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_snapshot_reads_image_frame() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"ignored").unwrap();
        std::fs::write(temp_dir.path().join("frame.png"), b"png-bytes").unwrap();
        let camera = DirectoryStillCamera::new(temp_dir.path().to_path_buf());

        let mut stream = camera.open_stream(Facing::User).await.unwrap();
        let image = stream.snapshot().await.unwrap();

        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.bytes(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_empty_dir_snapshot_fails() {
        let temp_dir = TempDir::new().unwrap();
        let camera = DirectoryStillCamera::new(temp_dir.path().to_path_buf());

        let mut stream = camera.open_stream(Facing::User).await.unwrap();
        assert!(matches!(stream.snapshot().await, Err(CameraError::Snapshot(_))));
    }

    #[tokio::test]
    async fn test_closed_stream_refuses_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("frame.jpg"), b"jpg").unwrap();
        let camera = DirectoryStillCamera::new(temp_dir.path().to_path_buf());

        let mut stream = camera.open_stream(Facing::User).await.unwrap();
        stream.close();
        stream.close();
        assert_eq!(stream.snapshot().await.unwrap_err(), CameraError::Closed);
    }

    #[tokio::test]
    async fn test_facing_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("environment")).unwrap();
        std::fs::write(temp_dir.path().join("front.jpg"), b"front").unwrap();
        std::fs::write(temp_dir.path().join("environment/rear.jpg"), b"rear").unwrap();
        let camera = DirectoryStillCamera::new(temp_dir.path().to_path_buf());

        let mut rear = camera.open_stream(Facing::Environment).await.unwrap();
        assert_eq!(rear.facing(), Facing::Environment);
        assert_eq!(rear.snapshot().await.unwrap().bytes(), b"rear");

        let mut front = camera.open_stream(Facing::User).await.unwrap();
        assert_eq!(front.snapshot().await.unwrap().bytes(), b"front");
    }
}
