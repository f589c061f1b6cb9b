//! Screen modes of the kiosk session.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The screen the kiosk is currently showing.
///
/// There is no terminal mode: the kiosk cycles indefinitely, returning to
/// `Welcome` on start-over and to `Idle` on inactivity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Attract loop; waits for a touch.
    #[default]
    Idle,
    /// Category choice and gallery entry point.
    Welcome,
    /// Generation credentials were rejected; the operator must switch them.
    CredentialSelection,
    /// Style cards for the chosen category.
    StyleSelection,
    /// Live camera view with shutter.
    Capture,
    /// Waiting on the generation provider.
    Generating,
    /// Shows the generated portrait.
    Result,
    /// Shareable-link view with manual save fallback.
    Publish,
    /// Browses previously generated portraits.
    Gallery,
}

impl Mode {
    /// Modes in which the idle timer does not run.
    ///
    /// Capture and generation must never be interrupted, and idle has nothing
    /// left to reset.
    pub fn suspends_idle_timer(self) -> bool {
        matches!(self, Mode::Idle | Mode::Capture | Mode::Generating)
    }
}
