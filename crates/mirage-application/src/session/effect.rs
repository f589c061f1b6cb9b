//! Side effects requested by the session state machine.

use mirage_core::image::EncodedImage;
use mirage_core::session::RequestTicket;

/// Work the controller performs on behalf of the state machine.
///
/// The machine itself never performs I/O; every outbound call, write or
/// hardware action is described by one of these and executed by
/// [`crate::KioskController`]. Completions come back as events.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the single generation call for this entry into `Generating`.
    Generate {
        ticket: RequestTicket,
        image: EncodedImage,
        prompt: String,
    },
    /// Abandon the in-flight generation; its completion will be discarded.
    CancelGeneration { ticket: RequestTicket },
    /// Increment the usage counter, then persist a gallery item.
    RecordGeneration {
        image: EncodedImage,
        style_name: String,
        prompt: String,
    },
    /// Upload the portrait for a shareable link.
    Publish {
        ticket: RequestTicket,
        image: EncodedImage,
    },
    /// Manual fallback: save the portrait on the kiosk.
    ExportImage {
        ticket: RequestTicket,
        image: EncodedImage,
        file_stem: String,
    },
    SelectCredentials,
    DeleteGalleryItem { id: String },
    ExportGalleryItem { id: String },
}

impl Effect {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Generate { .. } => "generate",
            Effect::CancelGeneration { .. } => "cancel_generation",
            Effect::RecordGeneration { .. } => "record_generation",
            Effect::Publish { .. } => "publish",
            Effect::ExportImage { .. } => "export_image",
            Effect::SelectCredentials => "select_credentials",
            Effect::DeleteGalleryItem { .. } => "delete_gallery_item",
            Effect::ExportGalleryItem { .. } => "export_gallery_item",
        }
    }
}
