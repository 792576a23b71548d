//! Classifier feature vectors

use crate::patterns::ErrorPattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of features extracted from a pattern
pub const FEATURE_COUNT: usize = 6;

/// Numeric description of an error pattern
///
/// Order: signature bucket, frequency, seconds since last occurrence,
/// recovery success rate, average recovery time, context feature count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_pattern(pattern: &ErrorPattern, now: DateTime<Utc>) -> Self {
        Self([
            pattern.signature.bucket() as f64,
            pattern.frequency as f64,
            pattern.seconds_since_last(now),
            pattern.recovery_success_rate,
            pattern.avg_recovery_time,
            pattern.context_features.len() as f64,
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub(crate) fn squared_distance(&self, other: &[f64; FEATURE_COUNT], scale: &[f64; FEATURE_COUNT]) -> f64 {
        self.0
            .iter()
            .zip(other)
            .zip(scale)
            .map(|((a, b), s)| ((a - b) / s).powi(2))
            .sum()
    }
}
