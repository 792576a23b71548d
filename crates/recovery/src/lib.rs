//! Failure classification, strategy selection and execution, and
//! dependency-ordered recovery for `faultline`.
//!
//! ## Key Components
//!
//! - **`coordinator`**: [`RecoveryCoordinator`], the façade callers use. It
//!   owns every other component below.
//! - **`patterns`**: per-signature error history with rolling statistics.
//! - **`severity`**: severity tiers and error categories.
//! - **`strategy`**: rule-based and trainable strategy selectors.
//! - **`executor`**: runs retry, backoff, fallback, rollback, restore and
//!   self-heal strategies under a timeout.
//! - **`checkpoint`**: in-memory service snapshots.
//! - **`history`**: bounded log of recent recoveries.
//! - **`orchestrator`**: recovers several services in dependency order.
//!
//! Circuit breakers come from `faultline-utils` and configuration from
//! `faultline-config`.

pub mod checkpoint;
pub mod coordinator;
pub mod executor;
pub mod history;
pub mod orchestrator;
pub mod patterns;
pub mod severity;
pub mod strategy;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use coordinator::{RecoveryCoordinator, RecoveryStats};
pub use executor::{
    ExecutionOutcome, LoggingRollback, RemediableCondition, RollbackHandler, StrategyExecutor,
};
pub use history::{HistorySummary, RecoveryHistory, RecoveryHistoryEntry};
pub use orchestrator::{DependencyGraph, RecoveryOrchestrator, ServiceRecoverer};
pub use patterns::{ErrorPattern, ErrorSignature, PatternTracker};
pub use severity::SeverityAssessor;
pub use strategy::{
    FeatureVector, RecoveryStrategy, RuleBasedSelector, StrategySelector, TrainedSelector,
    TrainingSample,
};

pub use faultline_config::RecoveryConfig;
pub use faultline_core::{
    operation, Error, ErrorCategory, ObservedError, RecoveryAction, RecoveryContext,
    RecoveryResult, RecoveryStatus, Result, RetryableOperation, Severity,
};
pub use faultline_utils::{CircuitBreakerStats, CircuitState};
