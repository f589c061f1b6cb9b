//! Idle monitor: the inactivity deadline awaited by the controller loop.

use mirage_core::session::Mode;
use std::time::Duration;
use tokio::time::Instant;

/// Tracks when the kiosk should fall back to the attract screen.
///
/// The monitor never fires on its own; the controller awaits [`expired`]
/// alongside the event queue, so a timeout is just one more serialized event.
///
/// [`expired`]: IdleMonitor::expired
#[derive(Debug, Clone)]
pub struct IdleMonitor {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl IdleMonitor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Restarts the countdown from now.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.timeout);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Applies the idle rule after an event has been handled.
    ///
    /// In a suspending mode the deadline is dropped. Otherwise it restarts on
    /// user input or a mode change, and is armed if nothing is pending.
    pub fn observe(&mut self, mode: Mode, user_input: bool, mode_changed: bool) {
        if mode.suspends_idle_timer() {
            self.disarm();
        } else if user_input || mode_changed || self.deadline.is_none() {
            self.arm();
        }
    }

    /// Completes at the deadline; never completes while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}
