//! Style preset domain models.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Subject grouping chosen on the welcome screen.
///
/// Each category has its own fixed catalog of style presets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    /// A single adult subject.
    Adult,
    /// A single child subject.
    Child,
    /// Two subjects photographed together.
    Couple,
}

impl Category {
    /// Whether prompts for this category vary by [`SubjectAttribute`].
    ///
    /// Couple portraits describe both subjects explicitly, so the attribute
    /// toggle is only offered for single-subject categories.
    pub fn requires_subject_attribute(self) -> bool {
        matches!(self, Category::Adult | Category::Child)
    }
}

/// Binary presentation choice used to pick gendered prompt variants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SubjectAttribute {
    #[default]
    Female,
    Male,
}

/// A named, pre-authored generation theme.
///
/// Presets are immutable and statically defined in [`super::catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePreset {
    /// Stable identifier, also the key for specialized prompt fragments.
    pub id: String,
    /// Name shown on the style card and stored with gallery items.
    pub name: String,
    /// One-line description shown under the name.
    pub description: String,
    /// Literal prompt template; empty means "build from id + attribute".
    #[serde(default)]
    pub template: String,
    /// Preview image shown on the style card and the attract loop.
    pub preview_url: String,
}

impl StylePreset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        preview_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            template: String::new(),
            preview_url: preview_url.into(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}
