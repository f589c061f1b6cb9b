//! Directory-backed GalleryRepository implementation.

use crate::dto::GalleryRecord;
use crate::paths::MiragePaths;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mirage_core::error::{MirageError, Result};
use mirage_core::gallery::{GalleryItem, GalleryRepository};
use mirage_core::image::EncodedImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Source of creation timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Gallery stored as one metadata file plus one image file per item.
///
/// Directory structure:
/// ```text
/// gallery/
/// ├── 1f0c...e2.toml
/// ├── 1f0c...e2.jpg
/// ├── 9a41...07.toml
/// └── 9a41...07.png
/// ```
///
/// The metadata file is written last, so an item exists only once its image
/// is fully on disk.
pub struct DirGalleryRepository {
    dir: PathBuf,
    clock: Clock,
}

impl DirGalleryRepository {
    /// Creates a repository rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await.map_err(|e| {
            MirageError::io(format!(
                "Failed to create gallery directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self {
            dir,
            clock: Arc::new(Utc::now),
        })
    }

    /// Creates a repository at the resolved gallery location.
    pub async fn from_paths(paths: &MiragePaths) -> Result<Self> {
        Self::new(paths.gallery_dir()?).await
    }

    /// Replaces the timestamp source (tests use a fixed sequence).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids are UUIDs; anything else (including path separators) never matches an item.
    fn is_valid_id(id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.toml"))
    }

    async fn read_record(&self, path: &Path) -> Result<GalleryRecord> {
        let content = fs::read_to_string(path).await?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolves a record's image file, which must be a bare name inside the gallery.
    fn image_path(&self, record: &GalleryRecord) -> Result<PathBuf> {
        let name = Path::new(&record.image_file);
        if name.file_name() != Some(name.as_os_str()) {
            return Err(MirageError::persistence(format!(
                "Gallery record {} points outside the gallery: {}",
                record.id, record.image_file
            )));
        }
        Ok(self.dir.join(name))
    }

    async fn load_item(&self, record_path: &Path) -> Result<GalleryItem> {
        let record = self.read_record(record_path).await?;
        let bytes = fs::read(self.image_path(&record)?).await?;
        record.into_item(bytes)
    }
}

/// Writes `bytes` to a temporary sibling and renames it over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| MirageError::internal(format!("No file name in {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, path).await?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl GalleryRepository for DirGalleryRepository {
    async fn put(
        &self,
        image: EncodedImage,
        style_name: &str,
        prompt: &str,
    ) -> Result<GalleryItem> {
        let id = Uuid::new_v4().to_string();
        let created_at = (self.clock)();
        let record = GalleryRecord::new(&id, created_at, &image, style_name, prompt);

        let image_path = self.dir.join(&record.image_file);
        write_atomic(&image_path, image.bytes())
            .await
            .map_err(|e| MirageError::persistence(format!("Failed to write gallery image: {e}")))?;

        let metadata = toml::to_string_pretty(&record)?;
        if let Err(e) = write_atomic(&self.record_path(&id), metadata.as_bytes()).await {
            let _ = remove_if_exists(&image_path).await;
            return Err(MirageError::persistence(format!(
                "Failed to write gallery record: {e}"
            )));
        }

        tracing::debug!(id = %id, style = style_name, bytes = image.len(), "Stored gallery item");

        Ok(GalleryItem {
            id,
            created_at,
            image,
            style_name: style_name.to_string(),
            prompt: prompt.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<GalleryItem>> {
        let mut items = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_record = path.extension().is_some_and(|ext| ext == "toml")
                && !entry.file_name().to_string_lossy().starts_with('.');
            if !is_record {
                continue;
            }

            match self.load_item(&path).await {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable gallery item");
                }
            }
        }

        // Newest first; id breaks ties so the order is stable.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<GalleryItem>> {
        let path = self.record_path(id);
        if !Self::is_valid_id(id) || !fs::try_exists(&path).await? {
            return Ok(None);
        }
        self.load_item(&path).await.map(Some)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id);
        if !Self::is_valid_id(id) || !fs::try_exists(&path).await? {
            tracing::debug!(id, "Delete of unknown gallery item ignored");
            return Ok(());
        }

        // Metadata first: once it is gone the item no longer lists.
        remove_if_exists(&path).await?;

        // The image is `<id>.<ext>`; find it by name so a corrupt record can still be removed.
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let entry_path = entry.path();
            if entry_path.file_stem().is_some_and(|stem| stem == id) {
                remove_if_exists(&entry_path).await?;
            }
        }

        tracing::debug!(id, "Deleted gallery item");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Clock that returns t=1s, t=2s, ... on successive calls.
    fn ticking_clock() -> Clock {
        let tick = Arc::new(Mutex::new(0i64));
        Arc::new(move || {
            let mut t = tick.lock().unwrap();
            *t += 1;
            Utc.timestamp_opt(1_700_000_000 + *t, 0).unwrap()
        })
    }

    async fn create_test_repository() -> (DirGalleryRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirGalleryRepository::new(temp_dir.path().join("gallery"))
            .await
            .unwrap()
            .with_clock(ticking_clock());
        (repo, temp_dir)
    }

    fn jpeg(bytes: &[u8]) -> EncodedImage {
        EncodedImage::new("image/jpeg", bytes.to_vec())
    }

    #[tokio::test]
    async fn test_put_and_find() {
        let (repo, _temp_dir) = create_test_repository().await;

        let item = repo
            .put(jpeg(b"portrait"), "Royal Majesty", "the prompt")
            .await
            .unwrap();

        let found = repo.find_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(found, item);
        assert!(repo.dir().join(format!("{}.jpg", item.id)).exists());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (repo, _temp_dir) = create_test_repository().await;

        let a = repo.put(jpeg(b"a"), "Style A", "prompt a").await.unwrap();
        let b = repo.put(jpeg(b"b"), "Style B", "prompt b").await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, _temp_dir) = create_test_repository().await;
        let item = repo.put(jpeg(b"x"), "Style", "p").await.unwrap();

        repo.delete(&item.id).await.unwrap();

        assert!(repo.find_by_id(&item.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
        assert!(!repo.dir().join(format!("{}.jpg", item.id)).exists());
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let (repo, _temp_dir) = create_test_repository().await;
        let kept = repo.put(jpeg(b"x"), "Style", "p").await.unwrap();

        repo.delete("no-such-item").await.unwrap();
        repo.delete("../escape").await.unwrap();
        repo.delete(&kept.id).await.unwrap();
        repo.delete(&kept.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_corrupt_record() {
        let (repo, _temp_dir) = create_test_repository().await;
        let id = Uuid::new_v4().to_string();
        std::fs::write(repo.dir().join(format!("{id}.toml")), "not = [valid").unwrap();
        std::fs::write(repo.dir().join(format!("{id}.png")), b"png").unwrap();
        let kept = repo.put(jpeg(b"keep"), "Style", "p").await.unwrap();

        repo.delete(&id).await.unwrap();

        assert!(!repo.dir().join(format!("{id}.toml")).exists());
        assert!(!repo.dir().join(format!("{id}.png")).exists());
        assert_eq!(repo.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_record_cannot_point_outside_gallery() {
        let (repo, temp_dir) = create_test_repository().await;
        let item = repo.put(jpeg(b"x"), "Style", "p").await.unwrap();
        let outside = temp_dir.path().join("outside.jpg");
        std::fs::write(&outside, b"not ours").unwrap();

        let record_path = repo.dir().join(format!("{}.toml", item.id));
        let mut record: GalleryRecord =
            toml::from_str(&std::fs::read_to_string(&record_path).unwrap()).unwrap();
        record.image_file = outside.to_string_lossy().into_owned();
        std::fs::write(&record_path, toml::to_string_pretty(&record).unwrap()).unwrap();

        assert!(repo.find_by_id(&item.id).await.is_err());
        assert!(repo.list().await.unwrap().is_empty());

        repo.delete(&item.id).await.unwrap();
        assert!(outside.exists());
        assert!(!record_path.exists());
        assert!(!repo.dir().join(format!("{}.jpg", item.id)).exists());
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_records() {
        let (repo, _temp_dir) = create_test_repository().await;
        let item = repo.put(jpeg(b"ok"), "Style", "p").await.unwrap();
        std::fs::write(repo.dir().join("broken.toml"), "not = [valid").unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, item.id);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let (repo, temp_dir) = create_test_repository().await;
        let item = repo.put(jpeg(b"keep"), "Style", "p").await.unwrap();
        drop(repo);

        let reopened = DirGalleryRepository::new(temp_dir.path().join("gallery"))
            .await
            .unwrap();
        let listed = reopened.list().await.unwrap();
        assert_eq!(listed, vec![item]);
    }
}
