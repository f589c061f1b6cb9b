//! Remote publish gateway contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::image::EncodedImage;

/// Whether a publish failure is fixable by staff or worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishErrorKind {
    /// Missing or rejected hosting credential.
    Configuration,
    /// Network or provider failure.
    Transient,
}

/// A failed attempt to turn a local artifact into a shareable link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PublishError {
    pub kind: PublishErrorKind,
    pub message: String,
}

impl PublishError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: PublishErrorKind::Configuration,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: PublishErrorKind::Transient,
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == PublishErrorKind::Configuration
    }

    /// Operator-facing guidance shown next to the manual save action.
    pub fn guidance(&self) -> &'static str {
        match self.kind {
            PublishErrorKind::Configuration => {
                "Sharing is not set up on this kiosk. Ask staff to configure the upload key, \
                 or save the portrait to this device instead."
            }
            PublishErrorKind::Transient => {
                "The download link could not be created right now. Go back and try again, \
                 or save the portrait to this device instead."
            }
        }
    }
}

/// Boundary around the external hosting call that yields a retrieval URL.
///
/// One attempt per call; no retries.
#[async_trait]
pub trait PublishGateway: Send + Sync {
    async fn publish(&self, image: &EncodedImage) -> Result<String, PublishError>;
}
