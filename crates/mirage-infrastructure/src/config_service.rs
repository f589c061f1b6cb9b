//! Configuration service implementation.
//!
//! Loads `config.toml`, writing a default file on first start so operators
//! have something to edit.

use crate::paths::MiragePaths;
use crate::storage::AtomicTomlFile;
use mirage_core::config::KioskConfig;
use mirage_core::error::Result;
use std::path::{Path, PathBuf};

/// Loads the kiosk configuration from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses the explicit `path` when given, otherwise the resolved default.
    pub fn resolve(path: Option<&Path>, paths: &MiragePaths) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(path.to_path_buf())),
            None => Ok(Self::new(paths.config_file()?)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration, creating the file with defaults when missing.
    pub fn load_or_create(&self) -> Result<KioskConfig> {
        let file = AtomicTomlFile::<KioskConfig>::new(self.path.clone());
        match file.load()? {
            Some(config) => Ok(config),
            None => {
                let config = KioskConfig::default();
                file.save(&config)?;
                tracing::info!(path = %self.path.display(), "Wrote default configuration");
                Ok(config)
            }
        }
    }
}
