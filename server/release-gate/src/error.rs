//! Structured error types for the release gate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
  /// Malformed request; surfaced to the caller as-is, never retried.
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  /// The phase sequence could not complete. Nothing was written to the ledger.
  #[error("deployment failed: {0}")]
  DeploymentFailed(String),

  #[error("config: {0}")]
  Config(String),

  /// Request body was not valid JSON or did not match the expected shape.
  #[error("invalid request body: {reason}")]
  Json {
    reason: String,
    field: Option<String>,
  },
}

impl GateError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn deployment_failed(msg: impl Into<String>) -> Self {
    Self::DeploymentFailed(msg.into())
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  /// Body error; names the offending field when serde reports a missing one.
  pub fn json(reason: impl Into<String>) -> Self {
    let reason = reason.into();
    let field = missing_field(&reason);
    Self::Json { reason, field }
  }
}

fn missing_field(reason: &str) -> Option<String> {
  let rest = &reason[reason.find("missing field `")? + "missing field `".len()..];
  rest.find('`').map(|end| rest[..end].to_string())
}

impl From<serde_json::Error> for GateError {
  fn from(e: serde_json::Error) -> Self {
    Self::json(e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;

  #[derive(Debug, Deserialize)]
  #[allow(dead_code)]
  struct Body {
    project_name: String,
    commit_hash: String,
  }

  #[test]
  fn missing_body_field_is_reported() {
    let err: GateError = serde_json::from_str::<Body>(r#"{"project_name":"demo"}"#)
      .unwrap_err()
      .into();
    match err {
      GateError::Json { field, .. } => assert_eq!(field.as_deref(), Some("commit_hash")),
      other => panic!("unexpected error: {:?}", other),
    }
  }

  #[test]
  fn syntax_error_has_no_field() {
    let err: GateError = serde_json::from_str::<Body>("not json").unwrap_err().into();
    assert!(matches!(err, GateError::Json { field: None, .. }));
  }
}
