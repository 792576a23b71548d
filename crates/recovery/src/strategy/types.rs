//! Recovery strategy value object

use faultline_core::constants::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES, DEFAULT_STRATEGY_TIMEOUT_SECS,
    LOW_SEVERITY_MAX_RETRIES,
};
use faultline_core::{RecoveryAction, RetryableOperation, Severity};
use std::fmt;
use std::time::Duration;

/// How to recover from one failure
#[derive(Clone)]
pub struct RecoveryStrategy {
    pub action: RecoveryAction,
    /// Upper bound on operation calls for the retry actions
    pub max_retries: u32,
    /// Base of the exponential backoff, `delay = base^attempt` seconds
    pub backoff_base: f64,
    /// Upper bound on the whole execution, including every retry
    pub timeout: Duration,
    pub fallback_handler: Option<RetryableOperation>,
}

impl RecoveryStrategy {
    /// Strategy with the fixed policy constants
    pub fn new(action: RecoveryAction) -> Self {
        Self {
            action,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            timeout: Duration::from_secs(DEFAULT_STRATEGY_TIMEOUT_SECS),
            fallback_handler: None,
        }
    }

    /// Strategy with the retry budget the policy assigns to `severity`
    pub fn for_severity(action: RecoveryAction, severity: Severity) -> Self {
        let max_retries = if severity == Severity::Low {
            LOW_SEVERITY_MAX_RETRIES
        } else {
            DEFAULT_MAX_RETRIES
        };
        Self::new(action).with_max_retries(max_retries)
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_backoff_base(mut self, backoff_base: f64) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, handler: RetryableOperation) -> Self {
        self.fallback_handler = Some(handler);
        self
    }

    /// Pause after the failed attempt `attempt` (0-indexed) under backoff
    ///
    /// Saturates at `Duration::MAX` for bases that overflow.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_base.powi(exponent);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl fmt::Debug for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryStrategy")
            .field("action", &self.action)
            .field("max_retries", &self.max_retries)
            .field("backoff_base", &self.backoff_base)
            .field("timeout", &self.timeout)
            .field(
                "fallback_handler",
                &self.fallback_handler.as_ref().map(|_| "<operation>"),
            )
            .finish()
    }
}
