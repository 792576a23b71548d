//! Rollback hook

use async_trait::async_trait;
use faultline_core::{RecoveryContext, Result};
use tracing::info;

/// Caller-defined undo of a transaction
#[async_trait]
pub trait RollbackHandler: Send + Sync {
    async fn rollback(&self, transaction_id: &str, context: &RecoveryContext) -> Result<()>;
}

/// Default handler that only records the rollback in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRollback;

#[async_trait]
impl RollbackHandler for LoggingRollback {
    async fn rollback(&self, transaction_id: &str, context: &RecoveryContext) -> Result<()> {
        info!(
            transaction_id = %transaction_id,
            service_id = %context.service_id(),
            "Rolling back transaction"
        );
        Ok(())
    }
}
