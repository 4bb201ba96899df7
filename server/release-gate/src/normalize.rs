//! Validate inbound request bodies into internal request types.

use crate::error::GateError;
use crate::types::*;

fn required(field: &str, value: &str) -> Result<String, GateError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(GateError::validation(field, "must not be empty"));
  }
  Ok(trimmed.to_string())
}

fn environment(value: &str) -> Result<Environment, GateError> {
  required("environment", value).map(|v| Environment::from_str_loose(&v))
}

/// The code change itself is kept byte-for-byte: it is the cache key.
pub fn analysis_request(raw: &InboundAnalysis) -> Result<AnalysisRequest, GateError> {
  Ok(AnalysisRequest {
    project: required("project_name", &raw.project_name)?,
    environment: environment(&raw.environment)?,
    commit: required("commit_hash", &raw.commit_hash)?,
    code_changes: raw.code_changes.clone(),
  })
}

pub fn deploy_target(raw: &InboundDeploy) -> Result<DeploymentTarget, GateError> {
  Ok(DeploymentTarget {
    project: required("project_name", &raw.project_name)?,
    environment: environment(&raw.environment)?,
    commit: required("commit_hash", &raw.commit_hash)?,
  })
}

/// Rollbacks always target the previous release.
pub fn rollback_target(raw: &InboundRollback) -> Result<DeploymentTarget, GateError> {
  Ok(DeploymentTarget {
    project: required("project_name", &raw.project_name)?,
    environment: environment(&raw.environment)?,
    commit: ROLLBACK_COMMIT.to_string(),
  })
}
