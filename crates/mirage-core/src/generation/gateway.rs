//! Generation gateway trait.

use async_trait::async_trait;
use thiserror::Error;

use super::classifier::{FailureClass, classify_failure};
use crate::image::EncodedImage;

/// A failed synthesis call.
///
/// Transport, authorization and empty-result conditions all surface as this
/// single type; [`ProviderError::class`] tells the session how to route it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn class(&self) -> FailureClass {
        classify_failure(&self.message)
    }

    /// Quota, permission or rate-limit failure; the user must switch credentials.
    pub fn is_credential_failure(&self) -> bool {
        self.class() == FailureClass::Credential
    }
}

/// Boundary around the external image-synthesis call.
///
/// Implementations make exactly one attempt per call. Retrying is a
/// user-visible decision taken by the session (back to capture), never an
/// internal loop here. Implementations must not touch persistence.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(
        &self,
        image: &EncodedImage,
        prompt: &str,
    ) -> Result<EncodedImage, ProviderError>;
}
