//! Gallery domain module.
//!
//! - `model`: the durable record of one generated artifact (`GalleryItem`)
//! - `repository`: persistence contracts for items and the usage counter

mod model;
mod repository;

pub use model::GalleryItem;
pub use repository::{GalleryRepository, UsageCounter};
