//! Structured recovery results

use super::action::RecoveryAction;
use super::failure::{ErrorCategory, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How a recovery ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStatus {
    Success,
    Failed,
    /// Rejected by an open circuit breaker without running anything
    CircuitOpen,
}

impl RecoveryStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryStatus::Success => "success",
            RecoveryStatus::Failed => "failed",
            RecoveryStatus::CircuitOpen => "circuit_open",
        }
    }
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single `recover_from_error` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryResult {
    pub status: RecoveryStatus,
    pub strategy_action: RecoveryAction,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub recovery_time_seconds: f64,
    /// Attempts the strategy made, at least 1 once it ran
    ///
    /// A call rejected by an open circuit breaker never ran, so it reports 0.
    pub attempts: u32,
    /// Value produced by the operation, fallback, restore or remediation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecoveryResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RecoveryStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_flat_strings() {
        let result = RecoveryResult {
            status: RecoveryStatus::CircuitOpen,
            strategy_action: RecoveryAction::RetryWithBackoff,
            severity: Severity::Medium,
            category: ErrorCategory::Transient,
            recovery_time_seconds: 0.0,
            attempts: 1,
            value: None,
            error: Some("circuit breaker for 'api' is open".to_string()),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], json!("circuit_open"));
        assert_eq!(value["strategy_action"], json!("retry_with_backoff"));
        assert_eq!(value["severity"], json!("medium"));
        assert!(value.get("value").is_none());
        assert!(!result.is_success());
    }
}
