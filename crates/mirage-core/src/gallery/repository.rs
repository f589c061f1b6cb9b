//! Gallery repository and usage counter traits.

use async_trait::async_trait;

use super::model::GalleryItem;
use crate::error::Result;
use crate::image::EncodedImage;

/// An abstract store for generated artifacts.
///
/// # Implementation Notes
///
/// - `put` assigns the id and timestamp and performs a durable write.
/// - `list` recomputes the full, finite listing on every call, newest first.
/// - `delete` is idempotent; an unknown id is not an error.
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    /// Persists a new item.
    ///
    /// # Returns
    ///
    /// - `Ok(GalleryItem)`: the stored record with its assigned id
    /// - `Err(_)`: the write failed; callers surface it and do not retry
    async fn put(&self, image: EncodedImage, style_name: &str, prompt: &str)
    -> Result<GalleryItem>;

    /// Lists every stored item, newest first.
    async fn list(&self) -> Result<Vec<GalleryItem>>;

    /// Finds a single item by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<GalleryItem>>;

    /// Deletes an item. Deleting a missing id succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// A persisted, display-only count of successful generations.
///
/// Independent of the item store: the count moves once per successful
/// generation even when the subsequent `put` fails.
#[async_trait]
pub trait UsageCounter: Send + Sync {
    async fn get(&self) -> Result<u64>;

    async fn increment_and_get(&self) -> Result<u64>;
}
