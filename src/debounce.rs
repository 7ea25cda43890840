//! Edit Debouncing
//!
//! One slot per editor: every edit pushes the deadline out by the full
//! delay, and only the last edit in a burst fires.

use std::future;
use std::time::Duration;
use tokio::time::{self, Instant};

/// Default quiet period after the last edit
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

/// Single-slot, deadline-based debounce timer
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer at now + delay
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve once the quiet period has elapsed, then disarm
    ///
    /// Pends forever while disarmed, so it can sit in a `select!` arm
    /// unconditionally. Cancel safe: dropping the future before the
    /// deadline leaves the timer armed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => future::pending::<()>().await,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}
