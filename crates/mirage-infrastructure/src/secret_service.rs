//! Secret service implementation.
//!
//! Reads provider API keys from `secret.json` and caches them until the cache
//! is invalidated (credential reselection does this).

use crate::paths::MiragePaths;
use mirage_core::config::{ApiKeyConfig, SecretConfig};
use mirage_core::error::Result;
use mirage_core::secret::SecretService;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Service for reading secret configuration.
///
/// # Example
///
/// ```ignore
/// use mirage_infrastructure::SecretServiceImpl;
/// use mirage_core::secret::SecretService;
///
/// let service = SecretServiceImpl::new(path);
/// let secrets = service.load_secrets().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    /// Cached secrets; `None` until first load or after invalidation.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_paths(paths: &MiragePaths) -> Result<Self> {
        Ok(Self::new(paths.secret_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a template with empty keys when no secret file exists.
    ///
    /// Returns `true` when a template was written.
    pub fn ensure_template(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let template = SecretConfig {
            gemini: Some(ApiKeyConfig::default()),
            imgbb: Some(ApiKeyConfig::default()),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&template)?)?;
        restrict_permissions(&self.path)?;
        tracing::info!(path = %self.path.display(), "Wrote secret template");
        Ok(true)
    }

    fn cached(&self) -> Option<SecretConfig> {
        match self.secrets.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, value: Option<SecretConfig>) {
        match self.secrets.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    fn read_file(&self) -> std::result::Result<SecretConfig, String> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e.kind()))?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        // serde_json errors quote input fragments; report the position only.
        serde_json::from_str(&content).map_err(|e| {
            format!(
                "Invalid secret file {} at line {}, column {}",
                self.path.display(),
                e.line(),
                e.column()
            )
        })
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> std::result::Result<SecretConfig, String> {
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }
        let loaded = self.read_file()?;
        self.store(Some(loaded.clone()));
        Ok(loaded)
    }

    fn invalidate_cache(&self) {
        self.store(None);
    }
}
