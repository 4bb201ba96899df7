//! Append-only deployment/rollback history and derived metrics.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::types::{DeploymentRecord, DeploymentStatus, Environment, LedgerMetrics};

/// In-memory ledger. Insertion order is chronological order; nothing is removed.
#[derive(Debug, Default)]
pub struct Ledger {
  records: Mutex<Vec<DeploymentRecord>>,
}

impl Ledger {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(&self, record: DeploymentRecord) {
    self.records.lock().push(record);
  }

  /// Build and append a record stamped while the lock is held, so timestamps
  /// never run backwards through the history.
  pub fn append_with<F>(&self, build: F) -> DeploymentRecord
  where
    F: FnOnce(DateTime<Utc>) -> DeploymentRecord,
  {
    let mut records = self.records.lock();
    let record = build(Utc::now());
    records.push(record.clone());
    record
  }

  /// Snapshot of every record, oldest first.
  pub fn history(&self) -> Vec<DeploymentRecord> {
    self.records.lock().clone()
  }

  /// Snapshot restricted to a project and/or environment, oldest first.
  pub fn filtered(
    &self,
    project: Option<&str>,
    environment: Option<&Environment>,
  ) -> Vec<DeploymentRecord> {
    self
      .records
      .lock()
      .iter()
      .filter(|r| project.map_or(true, |p| r.project == p))
      .filter(|r| environment.map_or(true, |e| &r.environment == e))
      .cloned()
      .collect()
  }

  /// Most recent record for a target: its current state.
  pub fn latest(&self, project: &str, environment: &Environment) -> Option<DeploymentRecord> {
    self
      .records
      .lock()
      .iter()
      .rev()
      .find(|r| r.project == project && &r.environment == environment)
      .cloned()
  }

  pub fn len(&self) -> usize {
    self.records.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn metrics(&self) -> LedgerMetrics {
    let records = self.records.lock();
    let total = records.len();
    let successful = records
      .iter()
      .filter(|r| r.status == DeploymentStatus::Deployed)
      .count();
    let rolled_back = records
      .iter()
      .filter(|r| r.status == DeploymentStatus::RolledBack)
      .count();
    let success_rate = if total > 0 {
      successful as f64 / total as f64 * 100.0
    } else {
      0.0
    };

    LedgerMetrics {
      total,
      successful,
      rolled_back,
      success_rate,
    }
  }
}
