//! Mutable bookkeeping for a single circuit breaker.

use super::types::{CircuitBreakerStats, CircuitState};
use tokio::time::Instant;

/// Internal state tracking for a circuit breaker, always accessed under the
/// breaker's lock
#[derive(Debug)]
pub struct MetricsState {
    pub state: CircuitState,
    pub failure_count: u32,
    /// The half-open trial call has been handed out
    pub trial_in_flight: bool,
    pub last_failure_time: Option<Instant>,
    pub last_state_change: Instant,
}

impl MetricsState {
    /// Create new metrics state
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            trial_in_flight: false,
            last_failure_time: None,
            last_state_change: Instant::now(),
        }
    }

    /// Reset internal counters
    pub fn reset_counters(&mut self) {
        self.failure_count = 0;
        self.trial_in_flight = false;
    }

    /// Snapshot of the current statistics
    pub fn stats(&self) -> CircuitBreakerStats {
        CircuitBreakerStats {
            state: self.state,
            failure_count: self.failure_count,
            trial_in_flight: self.trial_in_flight,
            last_failure_time: self.last_failure_time,
            last_state_change: self.last_state_change,
        }
    }
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}
