//! Known remediable conditions and their handlers

use crate::checkpoint::CheckpointStore;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

/// Failure conditions self-healing knows how to fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediableCondition {
    /// Lost or refused connection, fixed by reconnecting
    Connection,
    /// Memory pressure, relieved by dropping checkpoints
    Memory,
}

impl RemediableCondition {
    /// Match an error description against the known conditions
    pub fn detect(description: &str) -> Option<Self> {
        let lower = description.to_lowercase();
        if lower.contains("connection") {
            Some(Self::Connection)
        } else if lower.contains("memory") {
            Some(Self::Memory)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Memory => "memory",
        }
    }
}

/// Simulated reconnect
pub(crate) async fn reconnect(pause: Duration) -> Value {
    tokio::time::sleep(pause).await;
    info!("Connection re-established");
    json!({ "action": "reconnected" })
}

pub(crate) fn release_memory(checkpoints: &CheckpointStore) -> Value {
    let cleared = checkpoints.clear();
    info!(cleared, "Released memory held by checkpoints");
    json!({ "action": "memory_cleared", "checkpoints_cleared": cleared })
}
