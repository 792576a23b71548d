//! Shared utilities for faultline
//!
//! This crate provides the logging setup and the resilience primitives
//! (circuit breakers) used by the recovery core.

pub mod resilience;
pub mod tracing;

pub use resilience::*;
