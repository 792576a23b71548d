//! Stable error signatures

use faultline_core::ObservedError;
use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Stable identifier of an error, derived from its kind and message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ErrorSignature(u64);

impl ErrorSignature {
    pub fn of(error: &ObservedError) -> Self {
        let mut key = Vec::with_capacity(error.kind.len() + error.message.len() + 1);
        key.extend_from_slice(error.kind.as_bytes());
        // Separator keeps ("ab", "c") and ("a", "bc") apart
        key.push(0);
        key.extend_from_slice(error.message.as_bytes());
        Self(xxh3_64(&key))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Bucketed hash used as a classifier feature
    pub fn bucket(&self) -> u64 {
        self.0 % 1000
    }
}

impl From<&ObservedError> for ErrorSignature {
    fn from(error: &ObservedError) -> Self {
        Self::of(error)
    }
}

impl fmt::Display for ErrorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
