//! Secret management service trait.
//!
//! Defines the interface for loading provider API keys.

use crate::config::SecretConfig;

/// Service for loading secret configuration.
///
/// # Security Note
///
/// Implementations must never log key material or include it in error
/// messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration, from cache when available.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded secrets
    /// - `Err(String)`: Failed to load (message contains no secrets)
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Drops any cached copy so the next load reads storage again.
    fn invalidate_cache(&self);
}
