//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create an operation failure
    #[must_use]
    pub fn operation(message: impl Into<String>) -> Self {
        Error::Operation {
            message: message.into(),
            source: None,
        }
    }

    /// Create an operation failure with a source error
    #[must_use]
    pub fn operation_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Operation {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Wrap the last failure of an exhausted retry loop
    #[must_use]
    pub fn retries_exhausted(attempts: u32, last: Error) -> Self {
        Error::RetriesExhausted {
            attempts,
            last: Box::new(last),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: std::time::Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a circuit open rejection
    #[must_use]
    pub fn circuit_open(resource: impl Into<String>) -> Self {
        Error::CircuitOpen {
            resource: resource.into(),
        }
    }

    /// Create a missing checkpoint error
    #[must_use]
    pub fn checkpoint_not_found(service_id: impl Into<String>) -> Self {
        Error::CheckpointNotFound {
            service_id: service_id.into(),
        }
    }

    /// Create a missing operation error
    #[must_use]
    pub fn missing_operation(action: impl Into<String>) -> Self {
        Error::MissingOperation {
            action: action.into(),
        }
    }

    /// Create a circuit-break strategy failure
    #[must_use]
    pub fn circuit_tripped(resource: impl Into<String>) -> Self {
        Error::CircuitTripped {
            resource: resource.into(),
        }
    }

    /// Create a self-heal refusal
    #[must_use]
    pub fn cannot_self_heal(description: impl Into<String>) -> Self {
        Error::CannotSelfHeal {
            description: description.into(),
        }
    }

    /// Create an escalation
    #[must_use]
    pub fn escalated(description: impl Into<String>) -> Self {
        Error::Escalated {
            description: description.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
