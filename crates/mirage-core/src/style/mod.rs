//! Style presets and the fixed per-category catalogs.

pub mod catalog;
mod model;

pub use model::{Category, StylePreset, SubjectAttribute};
