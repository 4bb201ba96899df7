//! Simulated deploy/rollback: a fixed, ordered sequence of named phases.
//!
//! Phases are infallible and run strictly in order; each suspends for its
//! modeled duration. A deploy always ends `Completed`, a rollback always
//! ends `RolledBack`.

use std::time::Duration;
use tracing::info;

use crate::error::GateError;
use crate::types::DeploymentStatus;

pub const DEPLOY_PHASES: [&str; 7] = [
  "Building Docker image",
  "Running pre-deployment tests",
  "Uploading to container registry",
  "Deploying to Kubernetes cluster",
  "Running health checks",
  "Configuring load balancer",
  "Finalizing deployment",
];

pub const ROLLBACK_PHASES: [&str; 5] = [
  "Initiating rollback procedure",
  "Finding previous stable version",
  "Rolling back to previous version",
  "Updating service configuration",
  "Finalizing rollback",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
  Deploy,
  Rollback,
}

/// Terminal state of a plan. There is no failure terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Completed,
  RolledBack,
}

impl From<Outcome> for DeploymentStatus {
  fn from(outcome: Outcome) -> Self {
    match outcome {
      Outcome::Completed => DeploymentStatus::Deployed,
      Outcome::RolledBack => DeploymentStatus::RolledBack,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
  pub name: String,
  pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
  pub kind: PlanKind,
  pub phases: Vec<Phase>,
}

impl Plan {
  pub fn new(kind: PlanKind, names: &[&str], per_phase: Duration) -> Self {
    Self {
      kind,
      phases: names
        .iter()
        .map(|name| Phase {
          name: name.to_string(),
          duration: per_phase,
        })
        .collect(),
    }
  }

  pub fn deploy(per_phase: Duration) -> Self {
    Self::new(PlanKind::Deploy, &DEPLOY_PHASES, per_phase)
  }

  pub fn rollback(per_phase: Duration) -> Self {
    Self::new(PlanKind::Rollback, &ROLLBACK_PHASES, per_phase)
  }

  /// Sum of the modeled phase durations.
  pub fn total_duration(&self) -> Duration {
    self.phases.iter().map(|p| p.duration).sum()
  }

  fn outcome(&self) -> Outcome {
    match self.kind {
      PlanKind::Deploy => Outcome::Completed,
      PlanKind::Rollback => Outcome::RolledBack,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
  pub outcome: Outcome,
  pub steps_completed: u32,
  pub duration: Duration,
}

/// Run every phase in order and report completion.
pub async fn run(plan: &Plan) -> Result<Completion, GateError> {
  if plan.phases.is_empty() {
    return Err(GateError::deployment_failed(format!(
      "{:?} plan has no phases",
      plan.kind
    )));
  }

  let total = plan.phases.len();
  for (i, phase) in plan.phases.iter().enumerate() {
    info!(kind = ?plan.kind, step = i + 1, total, phase = %phase.name, "phase started");
    tokio::time::sleep(phase.duration).await;
  }

  let outcome = plan.outcome();
  info!(kind = ?plan.kind, ?outcome, steps = total, "plan finished");

  Ok(Completion {
    outcome,
    steps_completed: total as u32,
    duration: plan.total_duration(),
  })
}
