//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs are the on-disk schema. They are private to the infrastructure
//! layer and convert to and from domain types at the repository boundary.
//!
//! ### GalleryRecord Version History
//! - **1**: Initial schema; image bytes live in a sibling file
//!
//! ### UsageRecord Version History
//! - **1**: Initial schema with a single `count`

mod gallery_record;
mod usage_record;

pub use gallery_record::{GALLERY_SCHEMA_VERSION, GalleryRecord};
pub use usage_record::UsageRecord;
