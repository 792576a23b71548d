//! Observed failures and their classification

use crate::errors::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An error reported by a caller, described by its kind and message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedError {
    pub kind: String,
    pub message: String,
}

impl ObservedError {
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Textual description used for logging and self-heal matching
    #[must_use]
    pub fn description(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }
}

impl fmt::Display for ObservedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<&Error> for ObservedError {
    fn from(error: &Error) -> Self {
        let kind = match error {
            Error::Operation { .. } => "OperationError",
            Error::RetriesExhausted { .. } => "RetriesExhausted",
            Error::Timeout { .. } => "TimeoutError",
            Error::CircuitOpen { .. } | Error::CircuitTripped { .. } => "CircuitOpenError",
            Error::CheckpointNotFound { .. } => "CheckpointError",
            Error::MissingTransaction => "TransactionError",
            Error::MissingOperation { .. } => "UsageError",
            Error::CannotSelfHeal { .. } | Error::Escalated { .. } => "UnrecoverableError",
            Error::Configuration { .. } => "ConfigurationError",
            Error::FileSystem { .. } => "IOError",
            Error::Json { .. } => "DataError",
        };
        Self::new(kind, error.to_string())
    }
}

/// Failure taxonomy, orthogonal to [`Severity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Network or timeout style failures expected to clear on their own
    Transient,
    /// Memory or connection exhaustion
    Resource,
    /// Needs a rollback or restore to reach a consistent state
    Data,
    /// Not worth retrying automatically
    Fatal,
}

impl ErrorCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transient => "transient",
            ErrorCategory::Resource => "resource",
            ErrorCategory::Data => "data",
            ErrorCategory::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recovery priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
