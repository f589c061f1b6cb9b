//! Session domain module.
//!
//! # Module Structure
//!
//! - `mode`: the screens the kiosk can show (`Mode`)
//! - `event`: inputs to the state machine (`SessionEvent`, `RequestTicket`)
//! - `model`: the mutable session itself (`Session`, `PublishView`)

mod event;
mod mode;
mod model;

pub use event::{RequestTicket, SessionEvent};
pub use mode::Mode;
pub use model::{PublishStatus, PublishView, Session};
