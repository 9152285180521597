//! Wall-clock budget for a run

use std::time::{Duration, Instant};

/// Start instant plus the maximum time a run may take
///
/// The clock is only consulted between page visits, so a run can overshoot
/// the budget by however long one visit takes.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started: Instant,
    budget: Duration,
}

impl RunClock {
    /// Starts a clock now with the given budget
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Returns how long the run has been going
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the configured budget
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns true once the elapsed time exceeds the budget
    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.budget
    }

    /// Returns the time left before the budget runs out
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }
}
