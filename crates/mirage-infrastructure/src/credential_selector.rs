//! File-based credential reselection.
//!
//! On a kiosk the operator "switches accounts" by replacing the key in
//! `secret.json`; selecting credentials re-reads it.

use async_trait::async_trait;
use mirage_core::credential::{CredentialError, CredentialSelector};
use mirage_core::secret::SecretService;
use std::sync::Arc;

pub struct SecretFileCredentialSelector {
    secrets: Arc<dyn SecretService>,
}

impl SecretFileCredentialSelector {
    pub fn new(secrets: Arc<dyn SecretService>) -> Self {
        Self { secrets }
    }
}

#[async_trait]
impl CredentialSelector for SecretFileCredentialSelector {
    async fn select_credentials(&self) -> Result<(), CredentialError> {
        self.secrets.invalidate_cache();
        let secrets = self.secrets.load_secrets().await.map_err(CredentialError)?;

        if secrets.gemini_key().is_none() {
            return Err(CredentialError(
                "No generation API key configured in secret.json".to_string(),
            ));
        }

        tracing::info!("Generation credentials reloaded");
        Ok(())
    }
}
