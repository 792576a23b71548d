//! Shared table of error patterns keyed by signature

use super::pattern::ErrorPattern;
use super::signature::ErrorSignature;
use chrono::Utc;
use faultline_core::ObservedError;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

/// Error pattern table bounded by least-recently-seen eviction
///
/// Every operation takes the table lock for its whole read-modify-write, so
/// callers never observe a partially updated pattern.
#[derive(Debug)]
pub struct PatternTracker {
    patterns: Mutex<LruCache<ErrorSignature, ErrorPattern>>,
}

impl PatternTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            patterns: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Record an occurrence of `error` and return a snapshot of its pattern
    pub fn analyze(&self, error: &ObservedError, context: &HashMap<String, Value>) -> ErrorPattern {
        let signature = ErrorSignature::of(error);
        let now = Utc::now();
        let mut patterns = self.patterns.lock();

        if let Some(pattern) = patterns.get_mut(&signature) {
            pattern.record_occurrence(context.clone(), now);
            trace!(
                signature = %signature,
                frequency = pattern.frequency,
                "Updated error pattern"
            );
            return pattern.clone();
        }

        let pattern = ErrorPattern::new(signature, error.kind.clone(), context.clone(), now);
        if let Some((evicted, _)) = patterns.push(signature, pattern.clone()) {
            if evicted != signature {
                debug!(evicted = %evicted, "Pattern table full, evicted least recent signature");
            }
        }
        debug!(signature = %signature, kind = %error.kind, "Tracking new error pattern");
        pattern
    }

    /// Snapshot of the pattern `error` maps to, without counting an occurrence
    ///
    /// Unknown signatures yield a first-occurrence record that is not stored.
    pub fn observe(&self, error: &ObservedError, context: &HashMap<String, Value>) -> ErrorPattern {
        let signature = ErrorSignature::of(error);
        let known = self.patterns.lock().peek(&signature).cloned();
        known.unwrap_or_else(|| {
            ErrorPattern::new(signature, error.kind.clone(), context.clone(), Utc::now())
        })
    }

    /// Fold a recovery attempt into the signature's statistics
    ///
    /// Returns false when the signature is no longer tracked.
    pub fn record_outcome(&self, signature: ErrorSignature, succeeded: bool, duration_secs: f64) -> bool {
        let mut patterns = self.patterns.lock();
        match patterns.get_mut(&signature) {
            Some(pattern) => {
                pattern.record_outcome(succeeded, duration_secs);
                true
            }
            None => {
                debug!(signature = %signature, "Outcome for evicted pattern dropped");
                false
            }
        }
    }

    /// Snapshot of a tracked pattern without refreshing its recency
    pub fn get(&self, signature: ErrorSignature) -> Option<ErrorPattern> {
        self.patterns.lock().peek(&signature).cloned()
    }

    pub fn len(&self) -> usize {
        self.patterns.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn err(message: &str) -> ObservedError {
        ObservedError::new("ConnectionError", message)
    }

    #[test]
    fn test_analyze_counts_occurrences() {
        let tracker = PatternTracker::new(16);
        let first = tracker.analyze(&err("refused"), &HashMap::new());
        assert_eq!(first.frequency, 1);
        assert_eq!(first.recovery_success_rate, 0.0);

        let mut ctx = HashMap::new();
        ctx.insert("host".to_string(), json!("db-1"));
        let second = tracker.analyze(&err("refused"), &ctx);
        assert_eq!(second.frequency, 2);
        assert_eq!(second.signature, first.signature);
        assert_eq!(second.context_features["host"], json!("db-1"));
        assert!(second.last_occurrence >= first.last_occurrence);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_observe_leaves_table_untouched() {
        let tracker = PatternTracker::new(4);
        let unknown = tracker.observe(&err("refused"), &HashMap::new());
        assert_eq!(unknown.frequency, 1);
        assert!(tracker.is_empty());

        tracker.analyze(&err("refused"), &HashMap::new());
        tracker.analyze(&err("refused"), &HashMap::new());
        for _ in 0..5 {
            assert_eq!(tracker.observe(&err("refused"), &HashMap::new()).frequency, 2);
        }
        assert_eq!(tracker.get(unknown.signature).unwrap().frequency, 2);
    }

    #[test]
    fn test_least_recent_signature_is_evicted() {
        let tracker = PatternTracker::new(2);
        let a = tracker.analyze(&err("a"), &HashMap::new()).signature;
        let b = tracker.analyze(&err("b"), &HashMap::new()).signature;
        tracker.analyze(&err("a"), &HashMap::new());
        let c = tracker.analyze(&err("c"), &HashMap::new()).signature;

        assert_eq!(tracker.len(), 2);
        assert!(tracker.get(a).is_some());
        assert!(tracker.get(b).is_none());
        assert!(tracker.get(c).is_some());
        assert!(!tracker.record_outcome(b, true, 1.0));
    }

    #[test]
    fn test_record_outcome_updates_pattern() {
        let tracker = PatternTracker::new(4);
        let sig = tracker.analyze(&err("reset"), &HashMap::new()).signature;
        assert!(tracker.record_outcome(sig, true, 3.0));

        let pattern = tracker.get(sig).unwrap();
        assert!((pattern.recovery_success_rate - 0.1).abs() < 1e-9);
        assert!((pattern.avg_recovery_time - 0.3).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_ema_stays_in_range(
            outcomes in prop::collection::vec((any::<bool>(), prop::num::f64::ANY), 0..200)
        ) {
            let tracker = PatternTracker::new(1);
            let sig = tracker.analyze(&err("flaky"), &HashMap::new()).signature;
            for (succeeded, secs) in outcomes {
                tracker.record_outcome(sig, succeeded, secs);
            }
            let pattern = tracker.get(sig).unwrap();
            prop_assert!((0.0..=1.0).contains(&pattern.recovery_success_rate));
            prop_assert!(pattern.avg_recovery_time >= 0.0);
            prop_assert!(!pattern.avg_recovery_time.is_nan());
        }
    }
}
