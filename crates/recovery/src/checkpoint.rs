//! In-memory checkpoint store

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use faultline_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Snapshot of a service's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub service_id: String,
    pub timestamp: DateTime<Utc>,
    pub state: Value,
}

/// Latest checkpoint per service, last writer wins
///
/// Snapshots are stored whole and cloned out on restore, so readers never
/// see a partially written state.
#[derive(Debug, Default)]
pub struct CheckpointStore {
    checkpoints: DashMap<String, Checkpoint>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `state` as the latest checkpoint for `service_id`
    pub fn create(&self, service_id: impl Into<String>, state: Value) -> Checkpoint {
        let service_id = service_id.into();
        let checkpoint = Checkpoint {
            service_id: service_id.clone(),
            timestamp: Utc::now(),
            state,
        };
        debug!(service_id = %service_id, "Checkpoint created");
        self.checkpoints.insert(service_id, checkpoint.clone());
        checkpoint
    }

    /// The latest checkpoint for `service_id`
    pub fn restore(&self, service_id: &str) -> Result<Checkpoint> {
        self.checkpoints
            .get(service_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::checkpoint_not_found(service_id))
    }

    /// Drop every checkpoint, returning how many were removed
    pub fn clear(&self) -> usize {
        let removed = self.checkpoints.len();
        self.checkpoints.clear();
        info!(removed, "Checkpoint store cleared");
        removed
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.checkpoints.contains_key(service_id)
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_restore_returns_latest_state() {
        let store = CheckpointStore::new();
        store.create("db", json!({"version": 1}));
        store.create("db", json!({"version": 2}));

        let restored = store.restore("db").unwrap();
        assert_eq!(restored.state, json!({"version": 2}));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_checkpoint() {
        let store = CheckpointStore::new();
        let err = store.restore("ghost").unwrap_err();
        assert!(matches!(err, Error::CheckpointNotFound { ref service_id } if service_id == "ghost"));
    }

    #[test]
    fn test_clear() {
        let store = CheckpointStore::new();
        store.create("a", json!(1));
        store.create("b", json!(2));
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(!store.contains("a"));
    }
}
