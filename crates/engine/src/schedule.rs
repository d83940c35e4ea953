//! Trailing-edge debouncer for mutation-driven passes.
//!
//! Every schedule call pushes the deadline out by the full delay; only once
//! the deadline elapses with no further scheduling does the pass fire. All
//! methods take the current instant explicitly so tests can drive a simulated
//! clock instead of sleeping.

use std::time::{Duration, Instant};

/// Coalesces bursts of triggers into a single deferred firing.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given trailing delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The configured trailing delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the deadline at `now + delay`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True while a firing is pending.
    #[must_use]
    pub const fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consume the deadline if it has elapsed. Returns true at most once per
    /// armed deadline.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
