//! A monotonic wall-clock timer shared by all planning phases.

use std::time::{Duration, Instant};

/// Wraps the start instant of a planning run. All deadline checks measure
/// against the same timer so the phases share one budget.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The instant at which `timeout` expires, or `None` for an unlimited
    /// budget.
    pub fn deadline(&self, timeout: Option<Duration>) -> Option<Instant> {
        timeout.map(|timeout| self.start + timeout)
    }

    /// The time left until `timeout` expires, clamped to at least one
    /// second so a solver call is never started with a zero budget.
    pub fn remaining(&self, timeout: Option<Duration>) -> Option<Duration> {
        timeout.map(|timeout| timeout.saturating_sub(self.elapsed()).max(Duration::from_secs(1)))
    }

    pub fn is_expired(&self, deadline: Option<Instant>) -> bool {
        match deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}
