//! Recovery context supplied by callers

use crate::constants::DEFAULT_SERVICE_ID;
use crate::errors::Result;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A retry-capable unit of work: a no-argument callable that may fail
pub type RetryableOperation = Arc<dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Wrap an async closure as a [`RetryableOperation`]
pub fn operation<F, Fut>(f: F) -> RetryableOperation
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Everything a caller hands in alongside the failure
#[derive(Clone, Default)]
pub struct RecoveryContext {
    /// Resource key for the circuit breaker and checkpoint lookup
    pub service_id: Option<String>,
    /// The operation to re-run
    pub retry_func: Option<RetryableOperation>,
    /// Alternative used by the fallback strategy
    pub fallback: Option<RetryableOperation>,
    /// Transaction to undo on rollback
    pub transaction_id: Option<String>,
    /// Arbitrary caller metadata, kept as the pattern's context features
    pub metadata: HashMap<String, Value>,
}

impl RecoveryContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_service(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: RetryableOperation) -> Self {
        self.retry_func = Some(operation);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: RetryableOperation) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The resource key, `"default"` when none was given
    #[must_use]
    pub fn service_id(&self) -> &str {
        self.service_id.as_deref().unwrap_or(DEFAULT_SERVICE_ID)
    }
}

impl fmt::Debug for RecoveryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryContext")
            .field("service_id", &self.service_id)
            .field("retry_func", &self.retry_func.as_ref().map(|_| "<operation>"))
            .field("fallback", &self.fallback.as_ref().map(|_| "<operation>"))
            .field("transaction_id", &self.transaction_id)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_id_defaults() {
        assert_eq!(RecoveryContext::new().service_id(), "default");
        assert_eq!(
            RecoveryContext::new().with_service("billing").service_id(),
            "billing"
        );
    }

    #[test]
    fn test_builder_collects_metadata() {
        let ctx = RecoveryContext::new()
            .with_transaction("tx-42")
            .with_metadata("region", "eu-west-1")
            .with_metadata("attempt", 2);

        assert_eq!(ctx.transaction_id.as_deref(), Some("tx-42"));
        assert_eq!(ctx.metadata.len(), 2);
        assert_eq!(ctx.metadata["attempt"], json!(2));
        assert!(format!("{ctx:?}").contains("tx-42"));
    }

    #[test]
    fn test_operation_wrapper_is_callable_repeatedly() {
        let op = operation(|| async { Ok(json!("pong")) });
        let first = futures::executor::block_on(op()).unwrap();
        let second = futures::executor::block_on(op()).unwrap();
        assert_eq!(first, second);
    }
}
