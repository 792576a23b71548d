//! Strategy execution
//!
//! [`StrategyExecutor::execute`] runs one [`RecoveryStrategy`] against the
//! caller's context. Every path ends in an [`ExecutionOutcome`]; failures of
//! the protected operation never escape as panics or unhandled errors.

mod retry;
mod rollback;
mod self_heal;

pub use rollback::{LoggingRollback, RollbackHandler};
pub use self_heal::RemediableCondition;

use crate::checkpoint::CheckpointStore;
use crate::strategy::RecoveryStrategy;
use faultline_core::{Error, ObservedError, RecoveryAction, RecoveryContext, Result, ResultExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What running a strategy produced
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub result: Result<Value>,
    /// Operation calls made, at least 1
    pub attempts: u32,
}

impl ExecutionOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs recovery strategies
pub struct StrategyExecutor {
    checkpoints: Arc<CheckpointStore>,
    rollback: Arc<dyn RollbackHandler>,
    retry_pause: Duration,
    reconnect_pause: Duration,
}

impl StrategyExecutor {
    pub fn new(checkpoints: Arc<CheckpointStore>) -> Self {
        Self {
            checkpoints,
            rollback: Arc::new(LoggingRollback),
            retry_pause: Duration::from_secs(1),
            reconnect_pause: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_rollback_handler(mut self, handler: Arc<dyn RollbackHandler>) -> Self {
        self.rollback = handler;
        self
    }

    #[must_use]
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    #[must_use]
    pub fn with_reconnect_pause(mut self, pause: Duration) -> Self {
        self.reconnect_pause = pause;
        self
    }

    /// Run `strategy`, bounded by its timeout
    ///
    /// A timeout drops the in-flight attempt and reports `Error::Timeout`.
    pub async fn execute(
        &self,
        strategy: &RecoveryStrategy,
        error: &ObservedError,
        context: &RecoveryContext,
    ) -> ExecutionOutcome {
        let attempts = AtomicU32::new(0);
        let run = self.run(strategy, error, context, &attempts);

        let result = match tokio::time::timeout(strategy.timeout, run).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    action = %strategy.action,
                    timeout_ms = whole_millis(strategy.timeout),
                    "Recovery strategy timed out"
                );
                Err(Error::timeout(strategy.action.as_str(), strategy.timeout))
            }
        };

        ExecutionOutcome {
            result,
            attempts: attempts.load(Ordering::SeqCst).max(1),
        }
    }

    async fn run(
        &self,
        strategy: &RecoveryStrategy,
        error: &ObservedError,
        context: &RecoveryContext,
        attempts: &AtomicU32,
    ) -> Result<Value> {
        match strategy.action {
            RecoveryAction::Retry => {
                let operation = required_operation(context, strategy.action)?;
                let pause = self.retry_pause;
                retry::retry_with(operation, strategy.max_retries, attempts, |_| pause).await
            }
            RecoveryAction::RetryWithBackoff => {
                let operation = required_operation(context, strategy.action)?;
                retry::retry_with(operation, strategy.max_retries, attempts, |attempt| {
                    strategy.backoff_delay(attempt)
                })
                .await
            }
            RecoveryAction::Fallback => {
                let operation = required_operation(context, strategy.action)?;
                attempts.fetch_add(1, Ordering::SeqCst);
                match operation().await {
                    Ok(value) => Ok(value),
                    Err(e) => match &strategy.fallback_handler {
                        Some(fallback) => {
                            info!(error = %e, "Operation failed, using fallback");
                            attempts.fetch_add(1, Ordering::SeqCst);
                            fallback().await.context("fallback handler failed")
                        }
                        None => {
                            debug!("No fallback handler configured");
                            Err(e)
                        }
                    },
                }
            }
            RecoveryAction::CircuitBreak => Err(Error::circuit_tripped(context.service_id())),
            RecoveryAction::CheckpointRestore => {
                let checkpoint = self.checkpoints.restore(context.service_id())?;
                info!(
                    service_id = %context.service_id(),
                    checkpoint_time = %checkpoint.timestamp,
                    "Restored checkpoint"
                );
                Ok(checkpoint.state)
            }
            RecoveryAction::Rollback => {
                let transaction_id = context
                    .transaction_id
                    .as_deref()
                    .ok_or(Error::MissingTransaction)?;
                self.rollback
                    .rollback(transaction_id, context)
                    .await
                    .with_context(|| format!("rollback of transaction {transaction_id} failed"))?;
                Ok(json!({ "action": "rollback", "transaction_id": transaction_id }))
            }
            RecoveryAction::SelfHeal => self.self_heal(error).await,
            RecoveryAction::Escalate => {
                warn!(error = %error, "Escalating failure for human attention");
                Err(Error::escalated(error.description()))
            }
            RecoveryAction::Ignore => {
                debug!(error = %error, "Ignoring failure");
                Ok(json!({ "action": "ignored" }))
            }
        }
    }

    async fn self_heal(&self, error: &ObservedError) -> Result<Value> {
        let description = error.description();
        match RemediableCondition::detect(&description) {
            Some(RemediableCondition::Connection) => {
                Ok(self_heal::reconnect(self.reconnect_pause).await)
            }
            Some(RemediableCondition::Memory) => Ok(self_heal::release_memory(&self.checkpoints)),
            None => Err(Error::cannot_self_heal(description)),
        }
    }
}

impl std::fmt::Debug for StrategyExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyExecutor")
            .field("checkpoints", &self.checkpoints.len())
            .field("retry_pause", &self.retry_pause)
            .field("reconnect_pause", &self.reconnect_pause)
            .finish_non_exhaustive()
    }
}

/// Milliseconds for log fields, saturating for durations past `u64::MAX`
pub(crate) fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn required_operation(
    context: &RecoveryContext,
    action: RecoveryAction,
) -> Result<&faultline_core::RetryableOperation> {
    context
        .retry_func
        .as_ref()
        .ok_or_else(|| Error::missing_operation(action.as_str()))
}
