//! Dependency-ordered multi-service recovery
//!
//! The orchestrator walks failed services in dependency order and hands each
//! one with a plan entry to a [`ServiceRecoverer`]. A failed recovery is
//! recorded and the walk continues, so dependents are still attempted.

mod graph;

pub use graph::DependencyGraph;

use crate::strategy::RecoveryStrategy;
use async_trait::async_trait;
use dashmap::DashMap;
use faultline_core::RetryableOperation;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Recovers a single service with a given strategy
#[async_trait]
pub trait ServiceRecoverer: Send + Sync {
    /// Returns whether the service recovered
    async fn recover_service(
        &self,
        service_id: &str,
        strategy: &RecoveryStrategy,
        operation: Option<RetryableOperation>,
    ) -> bool;
}

/// Drives recovery of several failed services
pub struct RecoveryOrchestrator {
    graph: DependencyGraph,
    operations: DashMap<String, RetryableOperation>,
    parallel: bool,
}

impl RecoveryOrchestrator {
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            graph,
            operations: DashMap::new(),
            parallel: false,
        }
    }

    /// Recover independent dependency branches concurrently
    #[must_use]
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Register the health-check/recovery operation used for `service_id`
    pub fn register_service(&self, service_id: impl Into<String>, operation: RetryableOperation) {
        let service_id = service_id.into();
        debug!(service_id = %service_id, "Registered recovery operation");
        self.operations.insert(service_id, operation);
    }

    pub fn is_registered(&self, service_id: &str) -> bool {
        self.operations.contains_key(service_id)
    }

    fn operation_for(&self, service_id: &str) -> Option<RetryableOperation> {
        self.operations
            .get(service_id)
            .map(|entry| entry.value().clone())
    }

    /// Recover `failed` services in dependency order
    ///
    /// Only services with an entry in `plan` are attempted and reported.
    pub async fn orchestrate<R>(
        &self,
        recoverer: &R,
        failed: &BTreeSet<String>,
        plan: &HashMap<String, RecoveryStrategy>,
    ) -> HashMap<String, bool>
    where
        R: ServiceRecoverer + ?Sized,
    {
        let order = self.graph.recovery_order(failed);
        info!(
            failed = failed.len(),
            planned = order.iter().filter(|s| plan.contains_key(*s)).count(),
            parallel = self.parallel,
            "Starting orchestrated recovery"
        );

        let results: HashMap<String, bool> = if self.parallel {
            let groups = self.graph.independent_groups(&order);
            debug!(groups = groups.len(), "Recovering independent groups concurrently");
            let runs = groups
                .iter()
                .map(|group| self.recover_sequence(recoverer, group, plan));
            join_all(runs).await.into_iter().flatten().collect()
        } else {
            self.recover_sequence(recoverer, &order, plan)
                .await
                .into_iter()
                .collect()
        };

        let recovered = results.values().filter(|ok| **ok).count();
        info!(
            recovered,
            failed = results.len() - recovered,
            "Orchestrated recovery finished"
        );
        results
    }

    async fn recover_sequence<R>(
        &self,
        recoverer: &R,
        services: &[String],
        plan: &HashMap<String, RecoveryStrategy>,
    ) -> Vec<(String, bool)>
    where
        R: ServiceRecoverer + ?Sized,
    {
        let mut results = Vec::with_capacity(services.len());
        for service in services {
            let Some(strategy) = plan.get(service) else {
                debug!(service_id = %service, "No recovery plan for service, skipping");
                continue;
            };

            let recovered = recoverer
                .recover_service(service, strategy, self.operation_for(service))
                .await;
            if recovered {
                info!(service_id = %service, action = %strategy.action, "Service recovered");
            } else {
                warn!(service_id = %service, action = %strategy.action, "Service recovery failed");
            }
            results.push((service.clone(), recovered));
        }
        results
    }
}

impl std::fmt::Debug for RecoveryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryOrchestrator")
            .field("graph", &self.graph)
            .field("registered", &self.operations.len())
            .field("parallel", &self.parallel)
            .finish()
    }
}
