//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for faultline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for faultline operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by a caller-supplied operation
    Operation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Every permitted attempt failed
    RetriesExhausted { attempts: u32, last: Box<Error> },

    /// Operation timeout errors
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// The protected resource's circuit breaker rejected the call
    CircuitOpen { resource: String },

    /// Checkpoint restore requested for a service without a snapshot
    CheckpointNotFound { service_id: String },

    /// Rollback requested without a transaction id in the context
    MissingTransaction,

    /// A strategy needed the retryable operation but none was supplied
    MissingOperation { action: String },

    /// Calls to the resource were suspended by a circuit-break strategy
    CircuitTripped { resource: String },

    /// No self-heal handler matches the failure
    CannotSelfHeal { description: String },

    /// Automatic recovery abandoned; a human needs to look at it
    Escalated { description: String },

    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether this failure is expected to clear up on its own
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::CircuitOpen { .. } => true,
            Error::RetriesExhausted { last, .. } => last.is_transient(),
            Error::Operation { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("timeout")
                    || lower.contains("timed out")
                    || lower.contains("connection")
                    || lower.contains("unavailable")
            }
            _ => false,
        }
    }
}
