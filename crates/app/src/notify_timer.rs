//! Single-shot notify timer.
//!
//! At most one deadline is pending at a time. The engine polls
//! [`NotifyTimer::expired`] in its select loop and rearms the timer at the
//! end of each round.

use std::future::pending;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// The pending notify round, if any.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotifyTimer {
    deadline: Option<Instant>,
}

impl NotifyTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a round after `delay`, replacing any pending one.
    pub fn arm(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Schedule a round after `delay` unless one is already pending.
    ///
    /// Returns whether the timer was armed by this call.
    pub fn arm_if_idle(&mut self, delay: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.arm(delay);
        true
    }

    /// Make sure a round happens within `delay`, pulling a later deadline
    /// forward.
    pub fn arm_within(&mut self, delay: Duration) {
        let candidate = Instant::now() + delay;
        self.deadline = Some(match self.deadline {
            Some(current) if current <= candidate => current,
            _ => candidate,
        });
    }

    /// Cancel the pending round.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve when the pending round is due. Never resolves while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    }
}
