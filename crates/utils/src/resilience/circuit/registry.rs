//! Lazily created circuit breakers keyed by resource id.

use super::config::CircuitBreakerConfig;
use super::state::CircuitBreaker;
use super::types::CircuitState;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// One circuit breaker per protected resource, created on first use and kept
/// for the life of the registry
#[derive(Debug)]
pub struct CircuitBreakerRegistry {
    config: CircuitBreakerConfig,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// Get the breaker for `resource`, creating it if needed
    pub fn breaker(&self, resource: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(resource) {
            return Arc::clone(existing.value());
        }

        let entry = self.breakers.entry(resource.to_string()).or_insert_with(|| {
            debug!(resource = %resource, "Creating circuit breaker");
            Arc::new(CircuitBreaker::new(resource, self.config.clone()))
        });
        Arc::clone(entry.value())
    }

    /// Look up an existing breaker without creating one
    pub fn get(&self, resource: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers
            .get(resource)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// State of the breaker for `resource`, if one exists
    pub fn state(&self, resource: &str) -> Option<CircuitState> {
        self.get(resource).map(|breaker| breaker.state())
    }

    /// Number of breakers currently open
    pub fn open_count(&self) -> usize {
        self.breakers
            .iter()
            .filter(|entry| entry.value().state() == CircuitState::Open)
            .count()
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
