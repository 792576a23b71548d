//! Circuit breakers protecting individual resources
//!
//! ## Architecture
//!
//! This module is organized into focused sub-modules:
//!
//! - [`types`] - Core types and enums (CircuitState, CircuitBreakerStats)
//! - [`config`] - Configuration for circuit breaker behavior
//! - [`metrics`] - The bookkeeping each breaker keeps under its lock
//! - [`transitions`] - State transition logic for circuit breakers
//! - [`state`] - The circuit breaker itself and its call permits
//! - [`registry`] - Lazily created breakers keyed by resource id
//! - [`tests`] - Integration tests
//!
//! ## Examples
//!
//! ```rust,no_run
//! use faultline_utils::resilience::circuit::{CircuitBreakerConfig, CircuitBreakerRegistry};
//!
//! let registry = CircuitBreakerRegistry::new(CircuitBreakerConfig::default());
//! let breaker = registry.breaker("payments");
//!
//! if breaker.can_execute() {
//!     // call the payments service, then report the outcome
//!     breaker.record_success();
//! }
//! ```

pub mod config;
pub mod metrics;
pub mod registry;
pub mod state;
pub mod transitions;
pub mod types;

// Re-export public API
pub use config::CircuitBreakerConfig;
pub use registry::CircuitBreakerRegistry;
pub use state::{CallPermit, CircuitBreaker};
pub use types::{CircuitBreakerStats, CircuitState};
