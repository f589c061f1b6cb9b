//! Camera collaborator contract.
//!
//! The kiosk holds at most one live stream. A stream must be closed before a
//! stream with a different configuration is requested.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::image::EncodedImage;

/// Which physical camera to open.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facing {
    /// Front camera, facing the participant.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
    #[error("Snapshot failed: {0}")]
    Snapshot(String),
    #[error("Camera stream already closed")]
    Closed,
}

/// Opens live camera streams.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn open_stream(&self, facing: Facing) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// A live stream held by the capture screen.
#[async_trait]
pub trait CameraStream: Send {
    fn facing(&self) -> Facing;

    /// Grabs a single encoded still frame.
    async fn snapshot(&mut self) -> Result<EncodedImage, CameraError>;

    /// Releases the hardware. Must be safe to call more than once.
    fn close(&mut self);
}
