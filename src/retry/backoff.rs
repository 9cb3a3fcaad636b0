//! Linear backoff
//!
//! The n-th wait is `unit × n` (n starting at 1). Implements the `backoff`
//! crate's [`Backoff`] trait so it can be driven like any other schedule.

use backoff::backoff::Backoff;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearBackoff {
    unit: Duration,
    step: u32,
    max_steps: Option<u32>,
}

impl LinearBackoff {
    pub const fn new(unit: Duration) -> Self {
        Self {
            unit,
            step: 0,
            max_steps: None,
        }
    }

    /// Stop yielding delays after `max_steps` waits.
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Delay for the wait at zero-based `index`, without advancing.
    pub fn delay_at(&self, index: u32) -> Duration {
        self.unit.saturating_mul(index.saturating_add(1))
    }

    pub const fn unit(&self) -> Duration {
        self.unit
    }
}

impl Backoff for LinearBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_steps
            && self.step >= max
        {
            return None;
        }
        let delay = self.delay_at(self.step);
        self.step = self.step.saturating_add(1);
        Some(delay)
    }

    fn reset(&mut self) {
        self.step = 0;
    }
}
