//! Unified path management for Mirage configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mirage/            # Config directory
//! ├── config.toml              # Kiosk configuration
//! └── secret.json              # Provider API keys
//!
//! ~/.local/share/mirage/       # Data directory
//! ├── gallery/                 # One metadata record + one image per item
//! │   ├── <uuid>.toml
//! │   └── <uuid>.jpg
//! ├── usage.toml               # Usage counter
//! ├── exports/                 # Manual "save to this device" output
//! └── logs/                    # Rolling log files
//! ```
//!
//! Passing a base directory puts both trees under it, which is what tests do.

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "mirage";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for mirage_core::MirageError {
    fn from(err: PathError) -> Self {
        mirage_core::MirageError::config(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MiragePaths {
    base: Option<PathBuf>,
    data_override: Option<PathBuf>,
}

impl MiragePaths {
    /// Creates a path resolver.
    ///
    /// With `Some(base)`, config lives in `base/config` and data in `base/data`.
    /// With `None`, platform directories are used.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
            data_override: None,
        }
    }

    /// Uses `data_dir` for all data files regardless of `base`.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        self.data_override = data_dir;
        self
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.data_override {
            return Ok(dir.clone());
        }
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// The file should be readable by the kiosk user only (600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn gallery_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("gallery"))
    }

    pub fn usage_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("usage.toml"))
    }

    pub fn exports_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("exports"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}
