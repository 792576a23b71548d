//! Resilience patterns like circuit breakers.
//!
//! This module provides mechanisms to build robust, fault-tolerant systems
//! that can gracefully handle and recover from transient failures.
//!
//! ## Key Components
//!
//! - **`circuit`**: Implements the circuit breaker pattern to prevent
//!   repeatedly calling a resource that is known to be failing, plus a
//!   registry that creates one breaker per resource key on demand.

pub mod circuit;

pub use circuit::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerRegistry, CircuitBreakerStats,
    CircuitState,
};
