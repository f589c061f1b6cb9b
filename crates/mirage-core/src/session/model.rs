//! The kiosk session: the single mutable state of the active interaction.

use std::path::PathBuf;

use super::event::RequestTicket;
use super::mode::Mode;
use crate::image::EncodedImage;
use crate::publish::PublishError;
use crate::style::{Category, StylePreset, SubjectAttribute};

/// State of the shareable-link view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Uploading,
    Ready { url: String },
    Failed(PublishError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishView {
    /// Ticket of the upload this view is waiting for.
    pub ticket: RequestTicket,
    pub status: PublishStatus,
    /// Where the manual fallback saved the portrait, once it has.
    pub saved_to: Option<PathBuf>,
    /// Why the last manual save failed.
    pub save_error: Option<String>,
}

impl PublishView {
    pub fn is_uploading(&self) -> bool {
        self.status == PublishStatus::Uploading
    }

    pub fn uploading(ticket: RequestTicket) -> Self {
        Self {
            ticket,
            status: PublishStatus::Uploading,
            saved_to: None,
            save_error: None,
        }
    }
}

/// The active kiosk interaction.
///
/// Only the session state machine mutates a `Session`; renderers receive
/// clones. Fields are cleared, never dropped, when the kiosk starts over.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub mode: Mode,
    pub category: Option<Category>,
    pub style: Option<StylePreset>,
    pub subject_attribute: SubjectAttribute,
    pub captured_image: Option<EncodedImage>,
    pub generated_image: Option<EncodedImage>,
    /// Exact instruction sent with the last generation request.
    pub final_prompt: Option<String>,
    /// Last retryable generation failure, shown on the capture screen.
    pub last_error: Option<String>,
    pub publish: Option<PublishView>,
    /// One-line status for the current screen (saved path, deleted item...).
    pub notice: Option<String>,
}

impl Session {
    /// A fresh session on the attract screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every selection and artifact field, leaving `mode` untouched.
    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }

    /// True when no selection or artifact is held.
    pub fn is_cleared(&self) -> bool {
        Session {
            mode: self.mode,
            ..Session::default()
        } == *self
    }

    pub fn can_generate(&self) -> bool {
        self.style.is_some() && self.captured_image.is_some()
    }

    pub fn can_show_result(&self) -> bool {
        self.style.is_some() && self.generated_image.is_some()
    }

    pub fn style_name(&self) -> Option<&str> {
        self.style.as_ref().map(|style| style.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Session {
        Session {
            mode: Mode::Result,
            category: Some(Category::Adult),
            style: Some(StylePreset::new("adult-royal", "Royal Majesty", "", "")),
            subject_attribute: SubjectAttribute::Male,
            captured_image: Some(EncodedImage::new("image/jpeg", vec![1, 2])),
            generated_image: Some(EncodedImage::new("image/png", vec![3])),
            final_prompt: Some("prompt".into()),
            last_error: Some("oops".into()),
            publish: Some(PublishView::uploading(RequestTicket::new(4))),
            notice: Some("saved".into()),
        }
    }

    #[test]
    fn test_clear_keeps_mode_only() {
        let mut session = populated();
        assert!(!session.is_cleared());
        session.clear();
        assert!(session.is_cleared());
        assert_eq!(session.mode, Mode::Result);
        assert_eq!(session.subject_attribute, SubjectAttribute::Female);
    }

    #[test]
    fn test_preconditions() {
        let mut session = populated();
        assert!(session.can_generate());
        assert!(session.can_show_result());
        session.generated_image = None;
        assert!(!session.can_show_result());
        session.style = None;
        assert!(!session.can_generate());
    }
}
