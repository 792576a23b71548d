//! Circuit breaker state management.

use super::config::CircuitBreakerConfig;
use super::metrics::MetricsState;
use super::transitions::StateTransitions;
use super::types::{CircuitBreakerStats, CircuitState};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// Circuit breaker for a single protected resource
///
/// `can_execute`, `record_success` and `record_failure` each take the same
/// lock, so concurrent callers always observe a single consistent state.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    metrics: Mutex<MetricsState>,
    transitions: StateTransitions,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        Self {
            transitions: StateTransitions::new(name.clone(), config),
            metrics: Mutex::new(MetricsState::new()),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        self.transitions.config()
    }

    /// Get the current state of the circuit without triggering transitions
    pub fn state(&self) -> CircuitState {
        self.metrics.lock().state
    }

    /// Whether a call may go through right now
    ///
    /// An open circuit whose timeout has passed moves to half-open here and
    /// hands out its single trial call.
    pub fn can_execute(&self) -> bool {
        let mut metrics = self.metrics.lock();
        self.transitions.permit(&mut metrics, Instant::now())
    }

    /// Admit a call and hand back a permit that reports its outcome
    ///
    /// Returns `None` when the breaker rejects the call. A permit dropped
    /// without `success` or `failure` is recorded as a failure, which
    /// releases a half-open trial whose caller was cancelled.
    pub fn try_acquire(self: &Arc<Self>) -> Option<CallPermit> {
        self.can_execute().then(|| CallPermit {
            breaker: Arc::clone(self),
            settled: false,
        })
    }

    /// Record that a permitted call succeeded
    pub fn record_success(&self) {
        let mut metrics = self.metrics.lock();
        self.transitions.record_success(&mut metrics, Instant::now());
    }

    /// Record that a permitted call failed
    pub fn record_failure(&self) {
        let mut metrics = self.metrics.lock();
        self.transitions.record_failure(&mut metrics, Instant::now());
    }

    /// Get current circuit breaker statistics
    pub fn stats(&self) -> CircuitBreakerStats {
        self.metrics.lock().stats()
    }
}

/// An admitted call whose outcome is still owed to its breaker
#[derive(Debug)]
#[must_use = "report the outcome with `success` or `failure`"]
pub struct CallPermit {
    breaker: Arc<CircuitBreaker>,
    settled: bool,
}

impl CallPermit {
    pub fn success(mut self) {
        self.settled = true;
        self.breaker.record_success();
    }

    pub fn failure(mut self) {
        self.settled = true;
        self.breaker.record_failure();
    }
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        if !self.settled {
            debug!(breaker = %self.breaker.name, "Call abandoned before reporting an outcome");
            self.breaker.record_failure();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn breaker(threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig::new(threshold, Duration::from_millis(100)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_breaker_opens_on_failures() {
        let cb = breaker(3);

        for _ in 0..3 {
            assert!(cb.can_execute());
            cb.record_failure();
        }

        assert_eq!(cb.state(), CircuitState::Open);
        assert!(!cb.can_execute());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets_failure_count() {
        let cb = breaker(3);

        cb.record_failure();
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        cb.record_failure();

        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.stats().failure_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_breaker_half_open_recovery() {
        let cb = breaker(2);
        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_millis(150)).await;

        // Exactly one trial call is handed out
        assert!(cb.can_execute());
        assert_eq!(cb.state(), CircuitState::HalfOpen);
        assert!(!cb.can_execute());

        cb.record_success();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(cb.can_execute());
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_breaker_half_open_failure() {
        let cb = breaker(2);
        cb.record_failure();
        cb.record_failure();

        tokio::time::advance(Duration::from_millis(150)).await;
        assert!(cb.can_execute());

        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);
        assert!(!cb.can_execute());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_trial_permit_reopens_circuit() {
        let cb = Arc::new(breaker(1));
        cb.record_failure();
        tokio::time::advance(Duration::from_millis(150)).await;

        let permit = cb.try_acquire().unwrap();
        assert_eq!(cb.state(), CircuitState::HalfOpen);
        assert!(cb.try_acquire().is_none());

        // Caller went away mid-trial
        drop(permit);
        assert_eq!(cb.state(), CircuitState::Open);
        assert!(!cb.stats().trial_in_flight);

        tokio::time::advance(Duration::from_millis(150)).await;
        cb.try_acquire().unwrap().success();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_permit_records_once() {
        let cb = Arc::new(breaker(2));
        cb.try_acquire().unwrap().failure();
        assert_eq!(cb.stats().failure_count, 1);

        cb.try_acquire().unwrap().success();
        assert_eq!(cb.stats().failure_count, 0);
        assert_eq!(cb.state(), CircuitState::Closed);
    }
}
