//! Whole-cycle Retry Policy
//!
//! Bounds how many times a fully exhausted provider race is re-run.
//! Single-provider flakiness is already absorbed by the race itself, so
//! this only smooths over short network-wide outages.

use std::time::Duration;

/// Fixed-delay retry policy for resolution cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first cycle. Total cycles = `times + 1`.
    pub times: u32,
    /// Pause between cycles
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            times: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn fixed(times: u32, delay: Duration) -> Self {
        Self { times, delay }
    }

    /// Run each race exactly once.
    pub fn no_retry() -> Self {
        Self {
            times: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn max_cycles(&self) -> u32 {
        self.times.saturating_add(1)
    }

    /// Whether another cycle may start after `completed` failed ones.
    pub fn should_retry(&self, completed: u32) -> bool {
        completed < self.max_cycles()
    }
}
