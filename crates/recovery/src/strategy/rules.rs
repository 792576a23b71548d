//! Deterministic rule-based strategy selection

use super::{RecoveryStrategy, StrategySelector};
use crate::patterns::ErrorPattern;
use faultline_core::constants::RETRY_SUCCESS_RATE_THRESHOLD;
use faultline_core::{RecoveryAction, RecoveryContext, Severity};

/// Always-available selector driven by severity and success rate
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedSelector;

impl RuleBasedSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn action_for(pattern: &ErrorPattern, severity: Severity) -> RecoveryAction {
        match severity {
            Severity::Critical => RecoveryAction::Escalate,
            Severity::High => RecoveryAction::CircuitBreak,
            _ if pattern.recovery_success_rate > RETRY_SUCCESS_RATE_THRESHOLD => {
                RecoveryAction::Retry
            }
            _ => RecoveryAction::RetryWithBackoff,
        }
    }
}

impl StrategySelector for RuleBasedSelector {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn select(
        &self,
        pattern: &ErrorPattern,
        severity: Severity,
        _context: &RecoveryContext,
    ) -> RecoveryStrategy {
        RecoveryStrategy::for_severity(Self::action_for(pattern, severity), severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::ErrorSignature;
    use chrono::Utc;
    use faultline_core::ObservedError;
    use std::collections::HashMap;

    fn pattern(rate: f64) -> ErrorPattern {
        let error = ObservedError::new("TimeoutError", "slow");
        let mut p = ErrorPattern::new(ErrorSignature::of(&error), "TimeoutError", HashMap::new(), Utc::now());
        p.recovery_success_rate = rate;
        p
    }

    #[test]
    fn test_rule_table() {
        let selector = RuleBasedSelector::new();
        let ctx = RecoveryContext::new();

        let s = selector.select(&pattern(0.9), Severity::Critical, &ctx);
        assert_eq!(s.action, RecoveryAction::Escalate);
        assert_eq!(s.max_retries, 3);

        let s = selector.select(&pattern(0.9), Severity::High, &ctx);
        assert_eq!(s.action, RecoveryAction::CircuitBreak);

        let s = selector.select(&pattern(0.71), Severity::Low, &ctx);
        assert_eq!(s.action, RecoveryAction::Retry);
        assert_eq!(s.max_retries, 5);

        let s = selector.select(&pattern(0.7), Severity::Low, &ctx);
        assert_eq!(s.action, RecoveryAction::RetryWithBackoff);

        let s = selector.select(&pattern(0.0), Severity::Medium, &ctx);
        assert_eq!(s.action, RecoveryAction::RetryWithBackoff);
        assert_eq!(s.max_retries, 3);
    }
}
