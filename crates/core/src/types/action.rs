//! Recovery actions

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a recovery strategy does about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Re-run the operation with a fixed pause between attempts
    Retry,
    /// Re-run the operation with exponentially growing pauses
    RetryWithBackoff,
    /// Run the operation once and fall back to an alternative on failure
    Fallback,
    /// Stop calling the resource and report the failure
    CircuitBreak,
    /// Undo the transaction named in the context
    Rollback,
    /// Return the last checkpointed state of the service
    CheckpointRestore,
    /// Apply a known remediation for the failure
    SelfHeal,
    /// Give up and hand the failure to a human
    Escalate,
    /// Treat the failure as harmless
    Ignore,
}

impl RecoveryAction {
    /// Every action, in declaration order
    pub const ALL: [RecoveryAction; 9] = [
        RecoveryAction::Retry,
        RecoveryAction::RetryWithBackoff,
        RecoveryAction::Fallback,
        RecoveryAction::CircuitBreak,
        RecoveryAction::Rollback,
        RecoveryAction::CheckpointRestore,
        RecoveryAction::SelfHeal,
        RecoveryAction::Escalate,
        RecoveryAction::Ignore,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryAction::Retry => "retry",
            RecoveryAction::RetryWithBackoff => "retry_with_backoff",
            RecoveryAction::Fallback => "fallback",
            RecoveryAction::CircuitBreak => "circuit_break",
            RecoveryAction::Rollback => "rollback",
            RecoveryAction::CheckpointRestore => "checkpoint_restore",
            RecoveryAction::SelfHeal => "self_heal",
            RecoveryAction::Escalate => "escalate",
            RecoveryAction::Ignore => "ignore",
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
