//! Per-signature error pattern record

use super::signature::ErrorSignature;
use chrono::{DateTime, Utc};
use faultline_core::constants::{EMA_PREVIOUS_WEIGHT, EMA_SAMPLE_WEIGHT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Everything observed about one error signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub signature: ErrorSignature,
    pub error_kind: String,
    /// Occurrences seen, including the first
    pub frequency: u64,
    pub first_occurrence: DateTime<Utc>,
    pub last_occurrence: DateTime<Utc>,
    /// Rolling share of successful recoveries, always within [0, 1]
    pub recovery_success_rate: f64,
    /// Rolling recovery time in seconds, never negative
    pub avg_recovery_time: f64,
    /// Metadata of the most recent triggering context
    pub context_features: HashMap<String, Value>,
}

impl ErrorPattern {
    /// Create the record for a first occurrence
    ///
    /// New patterns start with no evidence of recoverability: a success rate
    /// of zero and no recovery time.
    pub fn new(
        signature: ErrorSignature,
        error_kind: impl Into<String>,
        context_features: HashMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            signature,
            error_kind: error_kind.into(),
            frequency: 1,
            first_occurrence: now,
            last_occurrence: now,
            recovery_success_rate: 0.0,
            avg_recovery_time: 0.0,
            context_features,
        }
    }

    /// Register another occurrence
    pub fn record_occurrence(&mut self, context_features: HashMap<String, Value>, now: DateTime<Utc>) {
        self.frequency += 1;
        self.last_occurrence = now;
        self.context_features = context_features;
    }

    /// Fold one recovery attempt into the rolling statistics
    pub fn record_outcome(&mut self, succeeded: bool, duration_secs: f64) {
        let sample = if succeeded { 1.0 } else { 0.0 };
        self.recovery_success_rate = (self.recovery_success_rate * EMA_PREVIOUS_WEIGHT
            + sample * EMA_SAMPLE_WEIGHT)
            .clamp(0.0, 1.0);

        let duration = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        self.avg_recovery_time =
            (self.avg_recovery_time * EMA_PREVIOUS_WEIGHT + duration * EMA_SAMPLE_WEIGHT).max(0.0);
    }

    /// Seconds between the last occurrence and `now`
    pub fn seconds_since_last(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.last_occurrence).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use faultline_core::ObservedError;

    fn pattern() -> ErrorPattern {
        let sig = ErrorSignature::of(&ObservedError::new("TimeoutError", "slow"));
        ErrorPattern::new(sig, "TimeoutError", HashMap::new(), Utc::now())
    }

    #[test]
    fn test_ema_update() {
        let mut p = pattern();
        p.record_outcome(true, 2.0);
        assert!((p.recovery_success_rate - 0.1).abs() < 1e-9);
        assert!((p.avg_recovery_time - 0.2).abs() < 1e-9);

        p.record_outcome(false, 0.0);
        assert!((p.recovery_success_rate - 0.09).abs() < 1e-9);
        assert!((p.avg_recovery_time - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_bad_durations_are_ignored() {
        let mut p = pattern();
        p.record_outcome(true, f64::NAN);
        p.record_outcome(true, -5.0);
        p.record_outcome(true, f64::INFINITY);
        assert_eq!(p.avg_recovery_time, 0.0);
    }

    #[test]
    fn test_occurrence_overwrites_context() {
        let mut p = pattern();
        let mut ctx = HashMap::new();
        ctx.insert("region".to_string(), Value::from("eu"));
        let later = p.last_occurrence + Duration::seconds(30);
        p.record_occurrence(ctx, later);

        assert_eq!(p.frequency, 2);
        assert_eq!(p.context_features["region"], Value::from("eu"));
        assert_eq!(p.seconds_since_last(later + Duration::seconds(5)), 5.0);
    }
}
