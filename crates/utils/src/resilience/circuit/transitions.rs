//! State transition logic for circuit breaker.
//!
//! Every function here takes the breaker's bookkeeping by `&mut`, so callers
//! hold the breaker lock for the whole read-decide-write sequence.

use super::config::CircuitBreakerConfig;
use super::metrics::MetricsState;
use super::types::CircuitState;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Handles state transitions for one named circuit breaker
#[derive(Debug, Clone)]
pub struct StateTransitions {
    name: String,
    config: CircuitBreakerConfig,
}

impl StateTransitions {
    /// Create new state transitions handler
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Transition to open state
    pub fn transition_to_open(&self, metrics: &mut MetricsState, now: Instant) {
        warn!(
            breaker = %self.name,
            from = %metrics.state,
            failures = metrics.failure_count,
            "Circuit breaker opening"
        );
        metrics.state = CircuitState::Open;
        metrics.last_state_change = now;
        metrics.last_failure_time = Some(now);
        metrics.reset_counters();
    }

    /// Transition to half-open state
    pub fn transition_to_half_open(&self, metrics: &mut MetricsState, now: Instant) {
        info!(breaker = %self.name, "Circuit breaker entering half-open state");
        metrics.state = CircuitState::HalfOpen;
        metrics.last_state_change = now;
        metrics.reset_counters();
    }

    /// Transition to closed state
    pub fn transition_to_closed(&self, metrics: &mut MetricsState, now: Instant) {
        info!(breaker = %self.name, "Circuit breaker closing");
        metrics.state = CircuitState::Closed;
        metrics.last_state_change = now;
        metrics.reset_counters();
    }

    /// Decide whether a call may proceed, moving Open to HalfOpen once the
    /// open timeout has passed
    pub fn permit(&self, metrics: &mut MetricsState, now: Instant) -> bool {
        match metrics.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = metrics
                    .last_failure_time
                    .map(|last| now.saturating_duration_since(last))
                    .unwrap_or_default();
                if elapsed > self.config.open_timeout {
                    self.transition_to_half_open(metrics, now);
                    metrics.trial_in_flight = true;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if metrics.trial_in_flight {
                    false
                } else {
                    metrics.trial_in_flight = true;
                    true
                }
            }
        }
    }

    /// Record a successful call and handle state transitions
    pub fn record_success(&self, metrics: &mut MetricsState, now: Instant) {
        match metrics.state {
            CircuitState::HalfOpen => self.transition_to_closed(metrics, now),
            CircuitState::Closed => {
                // Reset failure count on success in closed state
                metrics.failure_count = 0;
            }
            CircuitState::Open => {
                debug!(breaker = %self.name, "Ignoring success reported while open");
            }
        }
    }

    /// Record a failed call and handle state transitions
    pub fn record_failure(&self, metrics: &mut MetricsState, now: Instant) {
        match metrics.state {
            CircuitState::Closed => {
                metrics.failure_count += 1;
                metrics.last_failure_time = Some(now);
                if metrics.failure_count >= self.config.failure_threshold {
                    self.transition_to_open(metrics, now);
                }
            }
            CircuitState::HalfOpen => {
                // Any failure in half-open state reopens the circuit
                self.transition_to_open(metrics, now);
            }
            CircuitState::Open => {
                debug!(breaker = %self.name, "Ignoring failure reported while open");
            }
        }
    }
}
