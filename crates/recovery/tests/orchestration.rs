//! Multi-service recovery through the coordinator

use faultline_recovery::{
    operation, Error, RecoveryAction, RecoveryConfig, RecoveryCoordinator, RecoveryStrategy,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

fn config(parallel: bool) -> RecoveryConfig {
    let mut config = RecoveryConfig {
        parallel_orchestration: parallel,
        ..RecoveryConfig::default()
    };
    config.add_dependency("frontend", "api");
    config.add_dependency("frontend", "cdn");
    config.add_dependency("api", "database");
    config.add_dependency("api", "cache");
    config
}

/// Register a health check per service that logs its call and fails for
/// the services in `broken`
fn register(
    coordinator: &RecoveryCoordinator,
    services: &[&str],
    broken: &[&str],
) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for service in services {
        let name = service.to_string();
        let fails = broken.contains(service);
        let log = Arc::clone(&log);
        coordinator.register_service(
            *service,
            operation(move || {
                log.lock().push(name.clone());
                async move {
                    if fails {
                        Err(Error::operation("health check failed"))
                    } else {
                        Ok(json!("healthy"))
                    }
                }
            }),
        );
    }
    log
}

fn retry_plan(services: &[&str]) -> HashMap<String, RecoveryStrategy> {
    services
        .iter()
        .map(|s| {
            (
                s.to_string(),
                RecoveryStrategy::new(RecoveryAction::Retry).with_max_retries(2),
            )
        })
        .collect()
}

fn set(services: &[&str]) -> BTreeSet<String> {
    services.iter().map(|s| s.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_dependency_order_with_partial_failure() {
    let coordinator = RecoveryCoordinator::new(config(false)).unwrap();
    let services = ["frontend", "api", "database"];
    let log = register(&coordinator, &services, &["database"]);

    let results = coordinator
        .orchestrate_recovery(&set(&services), &retry_plan(&services))
        .await;

    assert_eq!(results.get("database"), Some(&false));
    assert_eq!(results.get("api"), Some(&true));
    assert_eq!(results.get("frontend"), Some(&true));

    // database is retried twice before api and frontend are attempted
    assert_eq!(
        *log.lock(),
        vec!["database", "database", "api", "frontend"]
    );

    // Each service recovery shows up in history like a single recovery
    assert_eq!(coordinator.get_recovery_stats().total_recoveries, 3);
}

#[tokio::test(start_paused = true)]
async fn test_unplanned_services_are_not_reported() {
    let coordinator = RecoveryCoordinator::new(config(false)).unwrap();
    let log = register(&coordinator, &["api", "database"], &[]);

    let results = coordinator
        .orchestrate_recovery(&set(&["api", "database"]), &retry_plan(&["api"]))
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results.get("api"), Some(&true));
    assert_eq!(*log.lock(), vec!["api"]);
}

#[tokio::test(start_paused = true)]
async fn test_unregistered_service_fails_retry() {
    let coordinator = RecoveryCoordinator::new(config(false)).unwrap();
    let results = coordinator
        .orchestrate_recovery(&set(&["cdn"]), &retry_plan(&["cdn"]))
        .await;
    assert_eq!(results.get("cdn"), Some(&false));
}

#[tokio::test(start_paused = true)]
async fn test_checkpoint_plan_without_operation() {
    let coordinator = RecoveryCoordinator::new(config(false)).unwrap();
    coordinator.create_checkpoint("cache", json!({ "warm": true }));

    let mut plan = HashMap::new();
    plan.insert(
        "cache".to_string(),
        RecoveryStrategy::new(RecoveryAction::CheckpointRestore),
    );
    let results = coordinator
        .orchestrate_recovery(&set(&["cache"]), &plan)
        .await;
    assert_eq!(results.get("cache"), Some(&true));
}

#[tokio::test(start_paused = true)]
async fn test_parallel_orchestration_keeps_dependency_order() {
    let mut config = config(true);
    config.add_dependency("reports", "warehouse");
    let coordinator = RecoveryCoordinator::new(config).unwrap();

    let services = ["frontend", "api", "database", "reports", "warehouse"];
    let log = register(&coordinator, &services, &[]);

    let results = coordinator
        .orchestrate_recovery(&set(&services), &retry_plan(&services))
        .await;
    assert_eq!(results.len(), services.len());
    assert!(results.values().all(|ok| *ok));

    let calls = log.lock().clone();
    let pos = |s: &str| calls.iter().position(|c| c == s).unwrap();
    assert!(pos("database") < pos("api"));
    assert!(pos("api") < pos("frontend"));
    assert!(pos("warehouse") < pos("reports"));
}

#[test]
fn test_cyclic_dependencies_are_rejected() {
    let mut config = config(false);
    config.add_dependency("database", "frontend");
    let err = RecoveryCoordinator::new(config).unwrap_err();
    assert!(err.to_string().contains("Circular dependency"));
}
