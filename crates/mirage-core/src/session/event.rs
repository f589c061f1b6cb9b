use std::fmt;
use std::path::PathBuf;

use crate::credential::CredentialError;
use crate::generation::ProviderError;
use crate::image::EncodedImage;
use crate::publish::PublishError;
use crate::style::{Category, SubjectAttribute};

/// Identifies one outbound gateway request.
///
/// Completions carry the ticket they were issued with; a completion whose
/// ticket is no longer current belongs to an abandoned request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything that can happen to a session: user input, timer expiry and
/// gateway completions. All of them travel through one serial queue.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Any touch or key press; keeps the idle timer from firing.
    ActivityDetected,
    /// The idle timer fired.
    IdleTimeout,
    /// Touch on the attract screen.
    Start,
    CategoryChosen(Category),
    StyleChosen {
        style_id: String,
        attribute: Option<SubjectAttribute>,
    },
    SetSubjectAttribute(SubjectAttribute),
    /// Shutter pressed; the controller snapshots the live stream.
    Shutter,
    /// Switch between front and rear camera.
    FlipCamera,
    PhotoCaptured(EncodedImage),
    CameraUnavailable(String),
    BackToStyles,
    GenerationFinished {
        ticket: RequestTicket,
        outcome: Result<EncodedImage, ProviderError>,
    },
    Retake,
    ChooseAnotherStyle,
    RequestShareLink,
    PublishFinished {
        ticket: RequestTicket,
        outcome: Result<String, PublishError>,
    },
    /// Manual fallback: save the portrait on the kiosk itself.
    SaveLocally,
    LocalSaveFinished {
        ticket: RequestTicket,
        outcome: Result<PathBuf, String>,
    },
    ReturnFromPublish,
    /// Back from style selection.
    Back,
    StartOver,
    OpenGallery,
    CloseGallery,
    DeleteGalleryItem(String),
    ExportGalleryItem(String),
    /// Reports the outcome of a gallery delete or export.
    GalleryActionFinished(Result<String, String>),
    SelectCredentials,
    CredentialSelectionFinished(Result<(), CredentialError>),
}

impl SessionEvent {
    /// Whether the event originates from a person at the kiosk.
    ///
    /// Timer expiry and gateway completions are not user input and do not
    /// count as activity.
    pub fn is_user_input(&self) -> bool {
        !matches!(
            self,
            SessionEvent::IdleTimeout
                | SessionEvent::CameraUnavailable(_)
                | SessionEvent::GenerationFinished { .. }
                | SessionEvent::PublishFinished { .. }
                | SessionEvent::LocalSaveFinished { .. }
                | SessionEvent::GalleryActionFinished(_)
                | SessionEvent::CredentialSelectionFinished(_)
        )
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::ActivityDetected => "activity_detected",
            SessionEvent::IdleTimeout => "idle_timeout",
            SessionEvent::Start => "start",
            SessionEvent::CategoryChosen(_) => "category_chosen",
            SessionEvent::StyleChosen { .. } => "style_chosen",
            SessionEvent::SetSubjectAttribute(_) => "set_subject_attribute",
            SessionEvent::Shutter => "shutter",
            SessionEvent::FlipCamera => "flip_camera",
            SessionEvent::PhotoCaptured(_) => "photo_captured",
            SessionEvent::CameraUnavailable(_) => "camera_unavailable",
            SessionEvent::BackToStyles => "back_to_styles",
            SessionEvent::GenerationFinished { .. } => "generation_finished",
            SessionEvent::Retake => "retake",
            SessionEvent::ChooseAnotherStyle => "choose_another_style",
            SessionEvent::RequestShareLink => "request_share_link",
            SessionEvent::PublishFinished { .. } => "publish_finished",
            SessionEvent::SaveLocally => "save_locally",
            SessionEvent::LocalSaveFinished { .. } => "local_save_finished",
            SessionEvent::ReturnFromPublish => "return_from_publish",
            SessionEvent::Back => "back",
            SessionEvent::StartOver => "start_over",
            SessionEvent::OpenGallery => "open_gallery",
            SessionEvent::CloseGallery => "close_gallery",
            SessionEvent::DeleteGalleryItem(_) => "delete_gallery_item",
            SessionEvent::ExportGalleryItem(_) => "export_gallery_item",
            SessionEvent::GalleryActionFinished(_) => "gallery_action_finished",
            SessionEvent::SelectCredentials => "select_credentials",
            SessionEvent::CredentialSelectionFinished(_) => "credential_selection_finished",
        }
    }
}
