use std::time::Instant;

/// Wall-clock budget for one decision.
///
/// `remaining_ms` is what agents receive as their time-remaining query. It
/// goes negative once the budget is spent; a decision returned after that is
/// a forfeit.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    limit_ms: f64,
}

impl Deadline {
    /// Starts the clock now.
    pub fn start(limit_ms: f64) -> Self {
        Self {
            start: Instant::now(),
            limit_ms,
        }
    }

    pub fn limit_ms(&self) -> f64 {
        self.limit_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn remaining_ms(&self) -> f64 {
        self.limit_ms - self.elapsed_ms()
    }

    pub fn expired(&self) -> bool {
        self.remaining_ms() < 0.0
    }
}


// Hard limit: the match runner forfeits any agent that returns with remaining_ms() < 0.
// Agents stop searching at their own threshold (10ms by default) to leave room to return.
