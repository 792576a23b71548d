//! Property tests over the coordinator

use faultline_recovery::{
    operation, Error, ObservedError, RecoveryAction, RecoveryConfig, RecoveryContext,
    RecoveryCoordinator, RecoveryStatus, RecoveryStrategy,
};
use proptest::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_retries_never_exceed_budget(
        max_retries in 0u32..8,
        failures in 0u32..10,
        backoff in any::<bool>(),
    ) {
        let runtime = paused_runtime();
        let coordinator = RecoveryCoordinator::new(RecoveryConfig::default()).unwrap();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let context = RecoveryContext::new().with_operation(operation(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < failures {
                    Err(Error::operation("unavailable"))
                } else {
                    Ok(json!(n))
                }
            }
        }));
        let action = if backoff { RecoveryAction::RetryWithBackoff } else { RecoveryAction::Retry };
        let strategy = RecoveryStrategy::new(action)
            .with_max_retries(max_retries)
            .with_backoff_base(1.5);

        let result = runtime.block_on(coordinator.recover_with_strategy(
            &ObservedError::new("ServiceError", "unavailable"),
            &strategy,
            &context,
        ));

        let made = calls.load(Ordering::SeqCst);
        prop_assert!(made <= max_retries);
        prop_assert_eq!(result.is_success(), failures < max_retries);
        if result.is_success() {
            prop_assert_eq!(made, failures + 1);
        }
    }

    #[test]
    fn prop_breaker_opens_after_threshold_failures(threshold in 1u32..6) {
        let runtime = paused_runtime();
        let config = RecoveryConfig { failure_threshold: threshold, ..RecoveryConfig::default() };
        let coordinator = RecoveryCoordinator::new(config).unwrap();
        let escalate = RecoveryStrategy::new(RecoveryAction::Escalate);
        let context = RecoveryContext::new().with_service("db");
        let error = ObservedError::new("DBError", "down");

        for _ in 0..threshold {
            let result = runtime.block_on(coordinator.recover_with_strategy(&error, &escalate, &context));
            prop_assert_eq!(result.status, RecoveryStatus::Failed);
        }
        let result = runtime.block_on(coordinator.recover_with_strategy(&error, &escalate, &context));
        prop_assert_eq!(result.status, RecoveryStatus::CircuitOpen);
    }
}
