//! Core domain types, errors, and constants for `faultline`.
//!
//! This crate establishes the foundational data structures and error handling
//! shared by the configuration, utility and recovery crates.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all failure modes a recovery can report.
//! - **`types`**: Observed errors, severity tiers, recovery actions, the
//!   recovery context handed in by callers and the structured result handed
//!   back to them.
//! - **`constants`**: Policy constants and environment variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
