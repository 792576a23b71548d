//! Severity assessment and error categorisation

use crate::patterns::ErrorPattern;
use faultline_core::constants::{HIGH_FREQUENCY_THRESHOLD, LOW_SUCCESS_RATE_THRESHOLD};
use faultline_core::{ErrorCategory, ObservedError, Severity};

const RESOURCE_MARKERS: &[&str] = &["memory", "exhausted", "too many", "pool", "quota", "disk full"];
const DATA_MARKERS: &[&str] = &[
    "transaction",
    "integrity",
    "constraint",
    "corrupt",
    "deadlock",
    "inconsistent",
    "checkpoint",
];
const DATA_KINDS: &[&str] = &["dataerror", "transactionerror", "integrityerror", "checkpointerror"];

/// Derives a severity tier and category from an error and its pattern
#[derive(Debug, Clone)]
pub struct SeverityAssessor {
    fatal_kinds: Vec<String>,
}

impl SeverityAssessor {
    pub fn new<I, S>(fatal_kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fatal_kinds: fatal_kinds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_fatal(&self, error: &ObservedError) -> bool {
        self.fatal_kinds
            .iter()
            .any(|kind| kind.eq_ignore_ascii_case(&error.kind))
    }

    /// First matching rule wins: fatal kind, then frequency, then success rate.
    pub fn assess(&self, error: &ObservedError, pattern: &ErrorPattern) -> Severity {
        if self.is_fatal(error) {
            Severity::Critical
        } else if pattern.frequency > HIGH_FREQUENCY_THRESHOLD {
            Severity::High
        } else if pattern.recovery_success_rate < LOW_SUCCESS_RATE_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Place the error in the failure taxonomy
    ///
    /// Unknown failures are treated as transient.
    pub fn categorize(&self, error: &ObservedError) -> ErrorCategory {
        if self.is_fatal(error) {
            return ErrorCategory::Fatal;
        }

        let kind = error.kind.to_lowercase();
        let text = error.description().to_lowercase();
        if RESOURCE_MARKERS.iter().any(|marker| text.contains(marker)) {
            ErrorCategory::Resource
        } else if DATA_KINDS.contains(&kind.as_str())
            || DATA_MARKERS.iter().any(|marker| text.contains(marker))
        {
            ErrorCategory::Data
        } else {
            ErrorCategory::Transient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::ErrorSignature;
    use chrono::Utc;
    use std::collections::HashMap;

    fn assessor() -> SeverityAssessor {
        SeverityAssessor::new(["OutOfMemoryError", "SystemError"])
    }

    fn pattern(frequency: u64, rate: f64) -> ErrorPattern {
        let error = ObservedError::new("TimeoutError", "slow");
        let mut p = ErrorPattern::new(
            ErrorSignature::of(&error),
            "TimeoutError",
            HashMap::new(),
            Utc::now(),
        );
        p.frequency = frequency;
        p.recovery_success_rate = rate;
        p
    }

    #[test]
    fn test_fatal_kind_is_critical() {
        let error = ObservedError::new("OutOfMemoryError", "heap");
        assert_eq!(assessor().assess(&error, &pattern(1, 0.9)), Severity::Critical);
        assert_eq!(assessor().categorize(&error), ErrorCategory::Fatal);

        let lowercase = ObservedError::new("outofmemoryerror", "heap");
        assert!(assessor().is_fatal(&lowercase));
        assert!(!assessor().is_fatal(&ObservedError::new("ConnectionError", "reset")));
    }

    #[test]
    fn test_frequency_checked_before_success_rate() {
        let error = ObservedError::new("TimeoutError", "slow");
        assert_eq!(assessor().assess(&error, &pattern(11, 0.1)), Severity::High);
        assert_eq!(assessor().assess(&error, &pattern(10, 0.1)), Severity::Medium);
        assert_eq!(assessor().assess(&error, &pattern(10, 0.3)), Severity::Low);
    }

    #[test]
    fn test_categories() {
        let a = assessor();
        assert_eq!(
            a.categorize(&ObservedError::new("TimeoutError", "request timed out")),
            ErrorCategory::Transient
        );
        assert_eq!(
            a.categorize(&ObservedError::new("ResourceError", "connection pool exhausted")),
            ErrorCategory::Resource
        );
        assert_eq!(
            a.categorize(&ObservedError::new("DBError", "transaction aborted")),
            ErrorCategory::Data
        );
        assert_eq!(
            a.categorize(&ObservedError::new("DataError", "bad row")),
            ErrorCategory::Data
        );
    }
}
