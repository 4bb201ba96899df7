//! Core engine: owns the cache and ledger, analyzes changes, runs deployments.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis;
use crate::cache::AnalysisCache;
use crate::config::Config;
use crate::deploy::{self, Plan};
use crate::enrich::{AnthropicEnricher, EnrichError, Enricher, Feedback};
use crate::error::GateError;
use crate::ledger::Ledger;
use crate::normalize;
use crate::types::*;

/// The release gate. Constructed once and shared (behind `Arc`) with handlers.
pub struct Engine {
  config: Config,
  cache: AnalysisCache,
  ledger: Arc<Ledger>,
  enricher: Option<Arc<dyn Enricher>>,
  analyses: AtomicU64,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self {
      config,
      cache: AnalysisCache::new(),
      ledger: Arc::new(Ledger::new()),
      enricher: None,
      analyses: AtomicU64::new(0),
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  /// Build from config, wiring the LLM enricher when an API key is present.
  pub fn from_config(config: Config) -> Result<Self, GateError> {
    let enricher =
      AnthropicEnricher::from_config(&config).map_err(|e| GateError::config(e.to_string()))?;
    let engine = Self::new(config);
    Ok(match enricher {
      Some(e) => engine.with_enricher(Arc::new(e)),
      None => engine,
    })
  }

  pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
    self.enricher = Some(enricher);
    self
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn cache(&self) -> &AnalysisCache {
    &self.cache
  }

  pub fn ledger(&self) -> &Ledger {
    &self.ledger
  }

  /// Analyze a code change. Identical (code, environment) pairs are computed once.
  pub async fn analyze(&self, raw: &InboundAnalysis) -> Result<AnalysisResult, GateError> {
    let req = normalize::analysis_request(raw)?;
    self.analyses.fetch_add(1, Ordering::Relaxed);

    let result = self
      .cache
      .get_or_compute(&req.code_changes, &req.environment, || self.compute(&req))
      .await;

    info!(
      project = %req.project,
      environment = %req.environment,
      commit = %req.commit,
      risk_score = result.risk_score,
      approved = result.approved,
      "analysis complete"
    );
    Ok(result)
  }

  async fn compute(&self, req: &AnalysisRequest) -> AnalysisResult {
    if !self.config.analysis_delay.is_zero() {
      tokio::time::sleep(self.config.analysis_delay).await;
    }

    let mut result = analysis::analyze(&req.code_changes, &req.environment);

    if let Some(enricher) = &self.enricher {
      match self.enrich(enricher.as_ref(), &req.code_changes).await {
        Ok(feedback) => {
          result.issues.extend(feedback.issues);
          result.recommendations.extend(feedback.recommendations);
        }
        Err(e) => warn!(error = %e, "enrichment unavailable; keeping rule-table feedback"),
      }
    }
    result
  }

  async fn enrich(&self, enricher: &dyn Enricher, code: &str) -> Result<Feedback, EnrichError> {
    let timeout = self.config.enrich_timeout;
    tokio::time::timeout(timeout, enricher.enrich(code))
      .await
      .map_err(|_| EnrichError::TimedOut(timeout))?
  }

  /// Deploy a commit and record it. The call cannot be cancelled once started.
  pub async fn deploy(&self, raw: &InboundDeploy) -> Result<DeploymentRecord, GateError> {
    let target = normalize::deploy_target(raw)?;
    self
      .execute(Plan::deploy(self.config.deploy_phase), target)
      .await
  }

  /// Roll a target back to its previous release and record it.
  pub async fn rollback(&self, raw: &InboundRollback) -> Result<DeploymentRecord, GateError> {
    let target = normalize::rollback_target(raw)?;
    self
      .execute(Plan::rollback(self.config.rollback_phase), target)
      .await
  }

  /// Run the plan on its own task so a dropped caller cannot interrupt it.
  /// The record is stamped and appended on that task, after every phase completed.
  async fn execute(
    &self,
    plan: Plan,
    target: DeploymentTarget,
  ) -> Result<DeploymentRecord, GateError> {
    let ledger = Arc::clone(&self.ledger);
    let task = tokio::spawn(async move {
      let completion = deploy::run(&plan).await?;
      let record = ledger.append_with(|now| DeploymentRecord {
        id: Uuid::new_v4(),
        timestamp: now,
        project: target.project,
        environment: target.environment,
        commit: target.commit,
        status: completion.outcome.into(),
        steps_completed: completion.steps_completed,
      });
      info!(
        id = %record.id,
        project = %record.project,
        environment = %record.environment,
        commit = %record.commit,
        status = ?record.status,
        "deployment recorded"
      );
      Ok::<_, GateError>(record)
    });

    task
      .await
      .map_err(|e| GateError::deployment_failed(format!("deployment task aborted: {}", e)))?
  }

  pub fn history(&self) -> Vec<DeploymentRecord> {
    self.ledger.history()
  }

  pub fn history_for(
    &self,
    project: Option<&str>,
    environment: Option<&Environment>,
  ) -> Vec<DeploymentRecord> {
    self.ledger.filtered(project, environment)
  }

  pub fn metrics(&self) -> SystemMetrics {
    let ledger = self.ledger.metrics();
    SystemMetrics {
      total_analyses: self.analyses.load(Ordering::Relaxed),
      total_deployments: ledger.total,
      successful_deployments: ledger.successful,
      rollbacks: ledger.rolled_back,
      success_rate: ledger.success_rate,
      cache_size: self.cache.len(),
    }
  }
}
