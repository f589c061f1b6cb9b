//! Credential reselection collaborator.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Credential selection failed: {0}")]
pub struct CredentialError(pub String);

/// Opaque action that lets the operator switch generation credentials.
///
/// The session only distinguishes "completed" from "failed to invoke".
#[async_trait]
pub trait CredentialSelector: Send + Sync {
    async fn select_credentials(&self) -> Result<(), CredentialError>;
}
