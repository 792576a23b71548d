//! Trainable nearest-centroid strategy selector

use super::features::{FeatureVector, FEATURE_COUNT};
use super::{RecoveryStrategy, StrategySelector};
use crate::patterns::ErrorPattern;
use chrono::Utc;
use faultline_core::{RecoveryAction, RecoveryContext, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A pattern's features labelled with the action that recovered it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub action: RecoveryAction,
}

impl TrainingSample {
    pub fn new(features: FeatureVector, action: RecoveryAction) -> Self {
        Self { features, action }
    }
}

#[derive(Debug, Clone)]
struct Centroid {
    action: RecoveryAction,
    mean: [f64; FEATURE_COUNT],
}

/// Selector that predicts the action whose successful samples lie closest
/// to the pattern's features
///
/// Each feature is scaled by its standard deviation over the training set so
/// that large-valued features like the signature bucket do not dominate.
#[derive(Debug, Clone)]
pub struct TrainedSelector {
    centroids: Vec<Centroid>,
    scale: [f64; FEATURE_COUNT],
    sample_count: usize,
}

impl TrainedSelector {
    /// Fit the selector, or `None` when fewer than `min_samples` usable samples
    pub fn train(samples: &[TrainingSample], min_samples: usize) -> Option<Self> {
        let usable: Vec<&TrainingSample> = samples
            .iter()
            .filter(|s| s.features.values().iter().all(|v| v.is_finite()))
            .collect();
        if usable.is_empty() || usable.len() < min_samples {
            debug!(
                samples = usable.len(),
                required = min_samples,
                "Not enough samples to train strategy classifier"
            );
            return None;
        }

        let n = usable.len() as f64;
        let mut overall = [0.0; FEATURE_COUNT];
        for sample in &usable {
            for (acc, v) in overall.iter_mut().zip(sample.features.values()) {
                *acc += v / n;
            }
        }

        let mut scale = [0.0; FEATURE_COUNT];
        for sample in &usable {
            for ((acc, v), mean) in scale.iter_mut().zip(sample.features.values()).zip(&overall) {
                *acc += (v - mean).powi(2) / n;
            }
        }
        for s in &mut scale {
            *s = s.sqrt();
            if *s < f64::EPSILON {
                *s = 1.0;
            }
        }

        let mut centroids: Vec<(RecoveryAction, [f64; FEATURE_COUNT], usize)> = Vec::new();
        for sample in &usable {
            let slot = match centroids.iter().position(|(a, _, _)| *a == sample.action) {
                Some(i) => i,
                None => {
                    centroids.push((sample.action, [0.0; FEATURE_COUNT], 0));
                    centroids.len() - 1
                }
            };
            let (_, sum, count) = &mut centroids[slot];
            for (acc, v) in sum.iter_mut().zip(sample.features.values()) {
                *acc += v;
            }
            *count += 1;
        }

        let centroids = centroids
            .into_iter()
            .map(|(action, sum, count)| Centroid {
                action,
                mean: sum.map(|total| total / count as f64),
            })
            .collect::<Vec<_>>();

        debug!(
            samples = usable.len(),
            classes = centroids.len(),
            "Trained strategy classifier"
        );

        Some(Self {
            centroids,
            scale,
            sample_count: usable.len(),
        })
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Actions the classifier can predict
    pub fn actions(&self) -> Vec<RecoveryAction> {
        self.centroids.iter().map(|c| c.action).collect()
    }

    pub fn predict(&self, features: &FeatureVector) -> RecoveryAction {
        self.centroids
            .iter()
            .map(|c| (c.action, features.squared_distance(&c.mean, &self.scale)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(action, _)| action)
            .unwrap_or(RecoveryAction::RetryWithBackoff)
    }
}

impl StrategySelector for TrainedSelector {
    fn name(&self) -> &'static str {
        "trained"
    }

    fn select(
        &self,
        pattern: &ErrorPattern,
        severity: Severity,
        _context: &RecoveryContext,
    ) -> RecoveryStrategy {
        let features = FeatureVector::from_pattern(pattern, Utc::now());
        RecoveryStrategy::for_severity(self.predict(&features), severity)
    }
}
