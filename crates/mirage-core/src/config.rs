//! Configuration models for `config.toml` and `secret.json`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::camera::Facing;

pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 90;
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GENERATION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_PUBLISH_ENDPOINT: &str = "https://api.imgbb.com/1/upload";

/// Root of `config.toml`. Every field has a default, so an empty file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KioskConfig {
    /// Seconds without activity before the kiosk returns to the attract screen.
    pub idle_timeout_secs: u64,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    pub generation: GenerationConfig,
    pub publish: PublishConfig,
    pub camera: CameraConfig,
    pub storage: StorageConfig,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            log_level: "info".to_string(),
            generation: GenerationConfig::default(),
            publish: PublishConfig::default(),
            camera: CameraConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl KioskConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs.max(1))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GENERATION_MODEL.to_string(),
            endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PublishConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PUBLISH_ENDPOINT.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory an external capture daemon writes still frames into.
    pub still_dir: Option<PathBuf>,
    pub default_facing: Facing,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<ApiKeyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imgbb: Option<ApiKeyConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyConfig {
    pub api_key: String,
}

impl SecretConfig {
    /// Gemini key, if present and non-blank.
    pub fn gemini_key(&self) -> Option<&str> {
        non_blank(self.gemini.as_ref())
    }

    /// ImgBB key, if present and non-blank.
    pub fn imgbb_key(&self) -> Option<&str> {
        non_blank(self.imgbb.as_ref())
    }
}

fn non_blank(config: Option<&ApiKeyConfig>) -> Option<&str> {
    config
        .map(|c| c.api_key.trim())
        .filter(|key| !key.is_empty())
}
