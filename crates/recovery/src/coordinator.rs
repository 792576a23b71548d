//! Recovery coordinator
//!
//! The single entry point callers use: gate on the resource's circuit
//! breaker, analyze the error, assess its severity, select a strategy,
//! execute, then record the outcome. Calls the breaker rejects are logged in
//! history but never counted as occurrences of the error.

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::executor::{RollbackHandler, StrategyExecutor};
use crate::history::{RecoveryHistory, RecoveryHistoryEntry};
use crate::orchestrator::{DependencyGraph, RecoveryOrchestrator, ServiceRecoverer};
use crate::patterns::{ErrorPattern, PatternTracker};
use crate::severity::SeverityAssessor;
use crate::strategy::{
    FeatureVector, RecoveryStrategy, RuleBasedSelector, StrategySelector, TrainedSelector,
    TrainingSample,
};
use async_trait::async_trait;
use chrono::Utc;
use faultline_config::RecoveryConfig;
use faultline_core::{
    Error, ErrorCategory, ObservedError, RecoveryContext, RecoveryResult, RecoveryStatus, Result,
    RetryableOperation, Severity,
};
use faultline_utils::tracing::{orchestration_span, recovery_span};
use faultline_utils::{
    CallPermit, CircuitBreakerConfig, CircuitBreakerRegistry, CircuitBreakerStats, CircuitState,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Aggregate recovery statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStats {
    /// Recoveries in the retained history window
    pub total_recoveries: usize,
    pub success_rate: f64,
    pub avg_recovery_time: f64,
    /// Breakers currently in the open state
    pub active_circuit_breakers_open_count: usize,
    pub tracked_patterns: usize,
    pub selector: String,
}

/// Analysis of one error before a strategy runs
struct Assessment {
    pattern: ErrorPattern,
    severity: Severity,
    category: ErrorCategory,
    features: FeatureVector,
}

/// Owns every piece of recovery state for one process or tenant
pub struct RecoveryCoordinator {
    config: RecoveryConfig,
    tracker: PatternTracker,
    assessor: SeverityAssessor,
    selector: RwLock<Arc<dyn StrategySelector>>,
    breakers: CircuitBreakerRegistry,
    checkpoints: Arc<CheckpointStore>,
    executor: StrategyExecutor,
    history: RecoveryHistory,
    orchestrator: RecoveryOrchestrator,
}

impl RecoveryCoordinator {
    /// Build a coordinator, failing on invalid or cyclic configuration
    pub fn new(config: RecoveryConfig) -> Result<Self> {
        config.validate()?;
        let graph = DependencyGraph::new(&config.dependencies)?;

        let checkpoints = Arc::new(CheckpointStore::new());
        let executor = StrategyExecutor::new(Arc::clone(&checkpoints))
            .with_retry_pause(config.retry_pause())
            .with_reconnect_pause(config.reconnect_pause());
        let breakers = CircuitBreakerRegistry::new(CircuitBreakerConfig::new(
            config.failure_threshold,
            config.open_timeout(),
        ));

        debug!(
            failure_threshold = config.failure_threshold,
            history_capacity = config.history_capacity,
            services = config.dependencies.len(),
            "Recovery coordinator created"
        );

        Ok(Self {
            tracker: PatternTracker::new(config.pattern_capacity),
            assessor: SeverityAssessor::new(config.fatal_error_kinds.iter().cloned()),
            selector: RwLock::new(Arc::new(RuleBasedSelector::new())),
            breakers,
            checkpoints,
            executor,
            history: RecoveryHistory::new(config.history_capacity),
            orchestrator: RecoveryOrchestrator::new(graph)
                .with_parallelism(config.parallel_orchestration),
            config,
        })
    }

    #[must_use]
    pub fn with_rollback_handler(mut self, handler: Arc<dyn RollbackHandler>) -> Self {
        self.executor = self.executor.with_rollback_handler(handler);
        self
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Recover from `error` with the strategy chosen by the active selector
    pub async fn recover_from_error(
        &self,
        error: &ObservedError,
        context: &RecoveryContext,
    ) -> RecoveryResult {
        let span = recovery_span(context.service_id(), &error.kind);
        async {
            let permit = self.breakers.breaker(context.service_id()).try_acquire();
            let assessment = self.assess(error, context, permit.is_some());
            let selector = Arc::clone(&*self.selector.read());
            let mut strategy = selector.select(&assessment.pattern, assessment.severity, context);
            if strategy.fallback_handler.is_none() {
                strategy.fallback_handler = context.fallback.clone();
            }
            debug!(
                selector = selector.name(),
                action = %strategy.action,
                severity = %assessment.severity,
                "Selected recovery strategy"
            );
            self.run(error, assessment, permit, &strategy, context).await
        }
        .instrument(span)
        .await
    }

    /// Recover from `error` with a caller-chosen strategy
    ///
    /// Goes through the same breaker gate and bookkeeping as
    /// [`recover_from_error`](Self::recover_from_error).
    pub async fn recover_with_strategy(
        &self,
        error: &ObservedError,
        strategy: &RecoveryStrategy,
        context: &RecoveryContext,
    ) -> RecoveryResult {
        let span = recovery_span(context.service_id(), &error.kind);
        async {
            let permit = self.breakers.breaker(context.service_id()).try_acquire();
            let assessment = self.assess(error, context, permit.is_some());
            self.run(error, assessment, permit, strategy, context).await
        }
        .instrument(span)
        .await
    }

    /// Only admitted calls count as an occurrence of the error
    fn assess(
        &self,
        error: &ObservedError,
        context: &RecoveryContext,
        admitted: bool,
    ) -> Assessment {
        let pattern = if admitted {
            self.tracker.analyze(error, &context.metadata)
        } else {
            self.tracker.observe(error, &context.metadata)
        };
        let severity = self.assessor.assess(error, &pattern);
        let category = self.assessor.categorize(error);
        let features = FeatureVector::from_pattern(&pattern, Utc::now());
        Assessment {
            pattern,
            severity,
            category,
            features,
        }
    }

    async fn run(
        &self,
        error: &ObservedError,
        assessment: Assessment,
        permit: Option<CallPermit>,
        strategy: &RecoveryStrategy,
        context: &RecoveryContext,
    ) -> RecoveryResult {
        let started = Instant::now();

        let Some(permit) = permit else {
            let rejection = Error::circuit_open(context.service_id());
            warn!(action = %strategy.action, "Recovery rejected by open circuit breaker");
            return self.finish(
                error,
                &assessment,
                strategy,
                context,
                RecoveryStatus::CircuitOpen,
                Some(rejection.to_string()),
                None,
                0,
                started,
            );
        };

        // A cancelled caller drops the permit here, which counts as a failure
        let outcome = self.executor.execute(strategy, error, context).await;
        let elapsed = started.elapsed().as_secs_f64();

        if outcome.succeeded() {
            permit.success();
        } else {
            permit.failure();
        }
        self.tracker
            .record_outcome(assessment.pattern.signature, outcome.succeeded(), elapsed);

        let (status, value, failure) = match outcome.result {
            Ok(value) => {
                info!(
                    action = %strategy.action,
                    attempts = outcome.attempts,
                    elapsed_secs = elapsed,
                    "Recovery succeeded"
                );
                (RecoveryStatus::Success, Some(value), None)
            }
            Err(e) => {
                warn!(
                    action = %strategy.action,
                    attempts = outcome.attempts,
                    transient = e.is_transient(),
                    error = %e,
                    "Recovery failed"
                );
                (RecoveryStatus::Failed, None, Some(e.to_string()))
            }
        };

        self.finish(
            error,
            &assessment,
            strategy,
            context,
            status,
            failure,
            value,
            outcome.attempts,
            started,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        error: &ObservedError,
        assessment: &Assessment,
        strategy: &RecoveryStrategy,
        context: &RecoveryContext,
        status: RecoveryStatus,
        failure: Option<String>,
        value: Option<Value>,
        attempts: u32,
        started: Instant,
    ) -> RecoveryResult {
        let recovery_time_seconds = started.elapsed().as_secs_f64();

        self.history.push(RecoveryHistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            service_id: context.service_id().to_string(),
            signature: assessment.pattern.signature,
            error_description: error.description(),
            category: assessment.category,
            severity: assessment.severity,
            strategy_action: strategy.action,
            status,
            error: failure.clone(),
            recovery_duration_secs: recovery_time_seconds,
            attempts,
            features: assessment.features,
        });

        RecoveryResult {
            status,
            strategy_action: strategy.action,
            severity: assessment.severity,
            category: assessment.category,
            recovery_time_seconds,
            attempts,
            value,
            error: failure,
        }
    }

    /// Store `state` as the latest checkpoint of `service_id`
    pub fn create_checkpoint(&self, service_id: impl Into<String>, state: Value) -> Checkpoint {
        self.checkpoints.create(service_id, state)
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn get_recovery_stats(&self) -> RecoveryStats {
        let summary = self.history.summary();
        RecoveryStats {
            total_recoveries: summary.total,
            success_rate: summary.success_rate,
            avg_recovery_time: summary.avg_recovery_time,
            active_circuit_breakers_open_count: self.breakers.open_count(),
            tracked_patterns: self.tracker.len(),
            selector: self.selector_name().to_string(),
        }
    }

    /// Register the operation orchestrated recoveries run for `service_id`
    pub fn register_service(&self, service_id: impl Into<String>, operation: RetryableOperation) {
        self.orchestrator.register_service(service_id, operation);
    }

    /// Recover several failed services in dependency order
    pub async fn orchestrate_recovery(
        &self,
        failed_services: &BTreeSet<String>,
        plan: &HashMap<String, RecoveryStrategy>,
    ) -> HashMap<String, bool> {
        self.orchestrator
            .orchestrate(self, failed_services, plan)
            .instrument(orchestration_span(failed_services.len()))
            .await
    }

    /// Swap in a trained selector when `samples` are sufficient
    ///
    /// Returns whether the trained selector is now active. With too little
    /// data the current selector stays in place.
    pub fn train(&self, samples: &[TrainingSample]) -> bool {
        match TrainedSelector::train(samples, self.config.min_training_samples) {
            Some(trained) => {
                info!(
                    samples = trained.sample_count(),
                    "Trained strategy selector activated"
                );
                *self.selector.write() = Arc::new(trained);
                true
            }
            None => false,
        }
    }

    /// Train on the successful recoveries in history
    pub fn train_from_history(&self) -> bool {
        self.train(&self.history.training_samples())
    }

    pub fn selector_name(&self) -> &'static str {
        self.selector.read().name()
    }

    pub fn circuit_state(&self, resource: &str) -> Option<CircuitState> {
        self.breakers.state(resource)
    }

    pub fn circuit_stats(&self, resource: &str) -> Option<CircuitBreakerStats> {
        self.breakers.get(resource).map(|breaker| breaker.stats())
    }

    /// Newest history entries first
    pub fn recent_history(&self, n: usize) -> Vec<RecoveryHistoryEntry> {
        self.history.recent(n)
    }

    pub fn pattern_count(&self) -> usize {
        self.tracker.len()
    }
}

#[async_trait]
impl ServiceRecoverer for RecoveryCoordinator {
    async fn recover_service(
        &self,
        service_id: &str,
        strategy: &RecoveryStrategy,
        operation: Option<RetryableOperation>,
    ) -> bool {
        let mut context = RecoveryContext::new().with_service(service_id);
        context.retry_func = operation;
        let error = ObservedError::new("ServiceFailure", format!("service '{service_id}' is down"));
        self.recover_with_strategy(&error, strategy, &context)
            .await
            .is_success()
    }
}

impl std::fmt::Debug for RecoveryCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryCoordinator")
            .field("config", &self.config)
            .field("patterns", &self.tracker.len())
            .field("selector", &self.selector_name())
            .field("breakers", &self.breakers.len())
            .field("checkpoints", &self.checkpoints.len())
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::{operation, RecoveryAction};
    use serde_json::json;

    fn coordinator() -> RecoveryCoordinator {
        RecoveryCoordinator::new(RecoveryConfig::default()).unwrap()
    }

    #[test]
    fn test_cyclic_config_is_rejected() {
        let mut config = RecoveryConfig::default();
        config.add_dependency("a", "b");
        config.add_dependency("b", "a");
        assert!(matches!(
            RecoveryCoordinator::new(config),
            Err(Error::Configuration { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_from_context_is_attached() {
        let coordinator = coordinator();
        let context = RecoveryContext::new()
            .with_operation(operation(|| async { Err(Error::operation("primary down")) }))
            .with_fallback(operation(|| async { Ok(json!("cached")) }));

        let strategy = RecoveryStrategy::new(RecoveryAction::Fallback);
        let result = coordinator
            .recover_with_strategy(&ObservedError::new("E", "m"), &strategy, &context)
            .await;
        // Explicit strategies are used as given
        assert_eq!(result.status, RecoveryStatus::Failed);

        // Rule selection never picks fallback, so train a selector that does
        let samples: Vec<TrainingSample> = (0..10)
            .map(|_| TrainingSample::new(FeatureVector([0.0; 6]), RecoveryAction::Fallback))
            .collect();
        assert!(coordinator.train(&samples));

        let result = coordinator
            .recover_from_error(&ObservedError::new("E", "m"), &context)
            .await;
        assert_eq!(result.strategy_action, RecoveryAction::Fallback);
        assert_eq!(result.value, Some(json!("cached")));
    }

    #[tokio::test]
    async fn test_stats_track_history() {
        let coordinator = coordinator();
        let ignore = RecoveryStrategy::new(RecoveryAction::Ignore);
        let escalate = RecoveryStrategy::new(RecoveryAction::Escalate);
        let ctx = RecoveryContext::new();

        coordinator
            .recover_with_strategy(&ObservedError::new("E", "a"), &ignore, &ctx)
            .await;
        coordinator
            .recover_with_strategy(&ObservedError::new("E", "b"), &escalate, &ctx)
            .await;

        let stats = coordinator.get_recovery_stats();
        assert_eq!(stats.total_recoveries, 2);
        assert!((stats.success_rate - 0.5).abs() < 1e-9);
        assert_eq!(stats.active_circuit_breakers_open_count, 0);
        assert_eq!(stats.tracked_patterns, 2);
        assert_eq!(stats.selector, "rules");
    }
}
