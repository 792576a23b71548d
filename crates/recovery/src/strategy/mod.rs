//! Recovery strategy selection
//!
//! A [`StrategySelector`] turns a pattern and its severity into a
//! [`RecoveryStrategy`]. [`RuleBasedSelector`] is always available;
//! [`TrainedSelector`] replaces it once enough labelled history exists.

mod classifier;
mod features;
mod rules;
mod types;

pub use classifier::{TrainedSelector, TrainingSample};
pub use features::{FeatureVector, FEATURE_COUNT};
pub use rules::RuleBasedSelector;
pub use types::RecoveryStrategy;

use crate::patterns::ErrorPattern;
use faultline_core::{RecoveryContext, Severity};

/// Chooses how to recover from a failure
pub trait StrategySelector: Send + Sync {
    /// Short name reported in logs and stats
    fn name(&self) -> &'static str;

    fn select(
        &self,
        pattern: &ErrorPattern,
        severity: Severity,
        context: &RecoveryContext,
    ) -> RecoveryStrategy;
}
