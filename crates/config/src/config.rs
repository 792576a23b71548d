//! Centralized recovery configuration
//!
//! `RecoveryConfig` is the single source of truth for the recovery core's
//! policy knobs. It is immutable once handed to a coordinator and is
//! `Clone + Send + Sync` so collaborators can keep their own copy.

use faultline_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Error kinds assessed as critical out of the box
pub const DEFAULT_FATAL_ERROR_KINDS: &[&str] = &[
    "OutOfMemoryError",
    "MemoryError",
    "SystemError",
    "FatalError",
    "StackOverflow",
    "Panic",
];

/// Recovery policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Failures recorded while closed before a breaker opens
    pub failure_threshold: u32,

    /// Seconds an open breaker waits before allowing a trial call
    pub open_timeout_secs: u64,

    /// Number of history entries kept for statistics
    pub history_capacity: usize,

    /// Number of distinct error signatures tracked
    pub pattern_capacity: usize,

    /// Labelled samples needed before the trained selector takes over
    pub min_training_samples: usize,

    /// Fixed pause between plain retries, in milliseconds
    pub retry_pause_ms: u64,

    /// Simulated reconnect pause for connection self-healing, in milliseconds
    pub reconnect_pause_ms: u64,

    /// Error kinds always treated as critical
    pub fatal_error_kinds: Vec<String>,

    /// Service id to the service ids it depends on
    pub dependencies: HashMap<String, Vec<String>>,

    /// Recover independent dependency branches concurrently
    pub parallel_orchestration: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout_secs: 60,
            history_capacity: 1000,
            pattern_capacity: 10_000,
            min_training_samples: 10,
            retry_pause_ms: 1000,
            reconnect_pause_ms: 1000,
            fatal_error_kinds: DEFAULT_FATAL_ERROR_KINDS
                .iter()
                .map(|kind| (*kind).to_string())
                .collect(),
            dependencies: HashMap::new(),
            parallel_orchestration: false,
        }
    }
}

impl RecoveryConfig {
    #[must_use]
    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(self.open_timeout_secs)
    }

    #[must_use]
    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }

    #[must_use]
    pub fn reconnect_pause(&self) -> Duration {
        Duration::from_millis(self.reconnect_pause_ms)
    }

    /// Declare that `service` depends on `dependency`
    pub fn add_dependency(&mut self, service: impl Into<String>, dependency: impl Into<String>) {
        self.dependencies
            .entry(service.into())
            .or_default()
            .push(dependency.into());
    }

    /// Reject values the recovery core cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.failure_threshold == 0 {
            return Err(Error::configuration(
                "failure_threshold must be at least 1",
            ));
        }
        if self.history_capacity == 0 {
            return Err(Error::configuration("history_capacity must be at least 1"));
        }
        if self.pattern_capacity == 0 {
            return Err(Error::configuration("pattern_capacity must be at least 1"));
        }
        for (service, deps) in &self.dependencies {
            if service.trim().is_empty() || deps.iter().any(|dep| dep.trim().is_empty()) {
                return Err(Error::configuration(
                    "dependency map contains an empty service id",
                ));
            }
        }
        Ok(())
    }
}
