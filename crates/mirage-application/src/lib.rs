//! Session orchestration for the Mirage kiosk.
//!
//! The state machine decides, the controller executes: [`SessionStateMachine`]
//! turns events into a new session state plus [`Effect`]s, and
//! [`KioskController`] runs those effects against the gateways, the artifact
//! store and the camera, feeding completions back as events.

pub mod capture;
pub mod idle;
pub mod session;

pub use capture::CaptureGuard;
pub use idle::IdleMonitor;
pub use session::{
    ControllerSettings, Effect, KioskController, KioskHandle, KioskServices, SessionSnapshot,
    SessionStateMachine,
};
