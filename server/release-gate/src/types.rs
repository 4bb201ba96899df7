//! Core types for the release gate (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the caller sends)
// ---------------------------------------------------------------------------

/// Body of `POST /api/analyze`. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundAnalysis {
  pub project_name: String,
  pub environment: String,
  pub commit_hash: String,
  pub code_changes: String,
}

/// Body of `POST /api/deploy`.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundDeploy {
  pub project_name: String,
  pub environment: String,
  pub commit_hash: String,
}

/// Body of `POST /api/rollback`. A `commit_hash`, if sent, is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundRollback {
  pub project_name: String,
  pub environment: String,
}

// ---------------------------------------------------------------------------
// Environment (normalized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
  Development,
  Staging,
  Production,
  /// Any other named target; keeps the caller's spelling.
  Other(String),
}

impl Environment {
  pub fn from_str_loose(s: &str) -> Self {
    let trimmed = s.trim();
    match trimmed.to_ascii_lowercase().as_str() {
      "development" | "dev" => Self::Development,
      "staging" | "stage" => Self::Staging,
      "production" | "prod" => Self::Production,
      _ => Self::Other(trimmed.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Development => "development",
      Self::Staging => "staging",
      Self::Production => "production",
      Self::Other(name) => name.as_str(),
    }
  }

  pub fn is_production(&self) -> bool {
    matches!(self, Self::Production)
  }
}

impl From<String> for Environment {
  fn from(s: String) -> Self {
    Self::from_str_loose(&s)
  }
}

impl From<Environment> for String {
  fn from(env: Environment) -> Self {
    env.as_str().to_string()
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Internal normalized requests
// ---------------------------------------------------------------------------

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
  pub project: String,
  pub environment: Environment,
  pub commit: String,
  pub code_changes: String,
}

/// A validated deploy or rollback target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
  pub project: String,
  pub environment: Environment,
  pub commit: String,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Lexical signals detected in a code change. Always all seven, never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PatternSignals {
  pub has_validation: bool,
  pub has_error_handling: bool,
  pub has_auth: bool,
  pub has_sql_injection_risk: bool,
  pub has_hardcoded_secrets: bool,
  pub is_payment_code: bool,
  pub has_database_ops: bool,
}

impl PatternSignals {
  /// Signals as (name, value) pairs, in declaration order.
  pub fn entries(&self) -> [(&'static str, bool); 7] {
    [
      ("has_validation", self.has_validation),
      ("has_error_handling", self.has_error_handling),
      ("has_auth", self.has_auth),
      ("has_sql_injection_risk", self.has_sql_injection_risk),
      ("has_hardcoded_secrets", self.has_hardcoded_secrets),
      ("is_payment_code", self.is_payment_code),
      ("has_database_ops", self.has_database_ops),
    ]
  }

  pub fn false_count(&self) -> usize {
    self.entries().iter().filter(|(_, v)| !v).count()
  }
}

/// The verdict for one (code change, environment) pair.
///
/// `test_coverage` is an estimate derived from the risk score, not a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
  pub risk_score: u8,
  pub test_coverage: u8,
  pub complexity_score: u8,
  pub security_score: u8,
  pub approved: bool,
  pub issues: Vec<String>,
  pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// A stable hex string identifying a (code change, environment) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

// ---------------------------------------------------------------------------
// Deployment ledger
// ---------------------------------------------------------------------------

/// Commit recorded for rollbacks, which target whatever ran before.
pub const ROLLBACK_COMMIT: &str = "previous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
  Deployed,
  RolledBack,
}

/// One ledger entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
  pub id: Uuid,
  pub timestamp: DateTime<Utc>,
  pub project: String,
  pub environment: Environment,
  pub commit: String,
  pub status: DeploymentStatus,
  pub steps_completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerMetrics {
  pub total: usize,
  pub successful: usize,
  pub rolled_back: usize,
  pub success_rate: f64,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
  pub total_analyses: u64,
  pub total_deployments: usize,
  pub successful_deployments: usize,
  pub rollbacks: usize,
  pub success_rate: f64,
  pub cache_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResponse {
  pub message: String,
  pub details: DeploymentRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
  pub deployments: Vec<DeploymentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  pub status: String,
  pub timestamp: DateTime<Utc>,
  pub service: String,
}

/// Structured error body for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn environment_aliases_normalize() {
    assert_eq!(Environment::from_str_loose("prod"), Environment::Production);
    assert_eq!(Environment::from_str_loose("Production"), Environment::Production);
    assert_eq!(Environment::from_str_loose(" staging "), Environment::Staging);
    assert_eq!(Environment::from_str_loose("dev"), Environment::Development);
    assert_eq!(
      Environment::from_str_loose("qa-east"),
      Environment::Other("qa-east".into())
    );
  }

  #[test]
  fn environment_serializes_canonical_name() {
    let json = serde_json::to_string(&Environment::from_str_loose("PROD")).unwrap();
    assert_eq!(json, "\"production\"");
    let other: Environment = serde_json::from_str("\"canary\"").unwrap();
    assert_eq!(other, Environment::Other("canary".into()));
  }

  #[test]
  fn false_count_counts_missing_signals() {
    let signals = PatternSignals {
      has_validation: true,
      has_auth: true,
      ..PatternSignals::default()
    };
    assert_eq!(signals.false_count(), 5);
  }

  #[test]
  fn record_status_uses_snake_case() {
    let json = serde_json::to_string(&DeploymentStatus::RolledBack).unwrap();
    assert_eq!(json, "\"rolled_back\"");
  }
}
