//! Bounded recovery history

use crate::patterns::ErrorSignature;
use crate::strategy::{FeatureVector, TrainingSample};
use chrono::{DateTime, Utc};
use faultline_core::{ErrorCategory, RecoveryAction, RecoveryStatus, Severity};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// One recovery invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryHistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub service_id: String,
    pub signature: ErrorSignature,
    pub error_description: String,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub strategy_action: RecoveryAction,
    pub status: RecoveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub recovery_duration_secs: f64,
    pub attempts: u32,
    /// Pattern features at selection time
    pub features: FeatureVector,
}

/// Aggregates over the retained entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub avg_recovery_time: f64,
}

/// Ring buffer of the most recent recoveries
#[derive(Debug)]
pub struct RecoveryHistory {
    capacity: usize,
    entries: Mutex<VecDeque<RecoveryHistoryEntry>>,
}

impl RecoveryHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, evicting the oldest when full
    pub fn push(&self, entry: RecoveryHistoryEntry) {
        let mut entries = self.entries.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn summary(&self) -> HistorySummary {
        let entries = self.entries.lock();
        let total = entries.len();
        if total == 0 {
            return HistorySummary::default();
        }

        let successes = entries
            .iter()
            .filter(|e| e.status == RecoveryStatus::Success)
            .count();
        let total_time: f64 = entries.iter().map(|e| e.recovery_duration_secs).sum();
        HistorySummary {
            total,
            successes,
            success_rate: successes as f64 / total as f64,
            avg_recovery_time: total_time / total as f64,
        }
    }

    /// Up to `n` entries, newest first
    pub fn recent(&self, n: usize) -> Vec<RecoveryHistoryEntry> {
        self.entries.lock().iter().rev().take(n).cloned().collect()
    }

    /// Successful recoveries as labelled classifier samples
    pub fn training_samples(&self) -> Vec<TrainingSample> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.status == RecoveryStatus::Success)
            .map(|e| TrainingSample::new(e.features, e.strategy_action))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
