//! Configuration management for faultline
//!
//! This crate holds the recovery policy knobs and the static service
//! dependency map, and loads them from JSON and the environment.

pub mod config;
pub mod loader;

pub use config::*;
pub use loader::*;
