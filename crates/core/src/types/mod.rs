//! Core domain types for the `faultline` recovery core.
//!
//! ## Organization
//!
//! - **`failure`**: The observed error a caller asks to recover from, its
//!   category and severity tier
//! - **`action`**: The recovery actions a strategy can prescribe
//! - **`context`**: The caller-supplied recovery context and retryable operations
//! - **`outcome`**: Structured recovery results handed back to callers

pub mod action;
pub mod context;
pub mod failure;
pub mod outcome;

// Re-export all public types for convenient access
pub use action::*;
pub use context::*;
pub use failure::*;
pub use outcome::*;
