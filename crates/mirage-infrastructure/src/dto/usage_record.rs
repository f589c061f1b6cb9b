//! Usage counter DTO.

use serde::{Deserialize, Serialize};

/// Contents of `usage.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default = "default_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub count: u64,
}

fn default_version() -> u32 {
    1
}

impl UsageRecord {
    pub fn new() -> Self {
        Self {
            schema_version: default_version(),
            count: 0,
        }
    }
}
