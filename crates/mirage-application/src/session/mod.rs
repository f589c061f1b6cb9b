//! Session orchestration.
//!
//! - `effect`: work requested by the state machine (`Effect`)
//! - `machine`: the pure transition function (`SessionStateMachine`)
//! - `controller`: the serial event loop that runs effects (`KioskController`)

mod controller;
mod effect;
mod machine;

pub use controller::{ControllerSettings, KioskController, KioskHandle, KioskServices, SessionSnapshot};
pub use effect::Effect;
pub use machine::SessionStateMachine;
