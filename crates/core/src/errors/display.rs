//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Operation { message, .. } => {
                write!(f, "operation failed: {message}")
            }
            Error::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {attempts} attempts: {last}")
            }
            Error::Timeout {
                operation,
                duration,
            } => {
                write!(f, "operation '{operation}' timed out after {duration:?}")
            }
            Error::CircuitOpen { resource } => {
                write!(f, "circuit breaker for '{resource}' is open")
            }
            Error::CheckpointNotFound { service_id } => {
                write!(f, "no checkpoint found for '{service_id}'")
            }
            Error::MissingTransaction => {
                write!(f, "rollback requires a transaction id")
            }
            Error::MissingOperation { action } => {
                write!(f, "{action} requires a retryable operation")
            }
            Error::CircuitTripped { resource } => {
                write!(f, "calls to '{resource}' suspended by circuit break")
            }
            Error::CannotSelfHeal { description } => {
                write!(f, "cannot self-heal: {description}")
            }
            Error::Escalated { description } => {
                write!(f, "needs human attention: {description}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
