//! HTTP handlers and router for the release gate.

use axum::{
  extract::{rejection::JsonRejection, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::GateError;
use crate::state::AppState;
use crate::types::*;

pub const SERVICE_NAME: &str = "Release Gate API";

impl IntoResponse for GateError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      GateError::Validation { field, reason } => (
        StatusCode::BAD_REQUEST,
        ErrorOutput::new(reason.clone()).with_field(field.clone()),
      ),
      GateError::Json { reason, field } => {
        let body = ErrorOutput::new(format!("invalid request body: {}", reason));
        let body = match field {
          Some(f) => body.with_field(f.clone()),
          None => body,
        };
        (StatusCode::BAD_REQUEST, body)
      }
      GateError::DeploymentFailed(_) | GateError::Config(_) => {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorOutput::new(self.to_string()))
      }
    };
    (status, Json(body)).into_response()
  }
}

impl From<JsonRejection> for GateError {
  fn from(rejection: JsonRejection) -> Self {
    GateError::json(rejection.body_text())
  }
}

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/api/health", get(health))
    .route("/api/analyze", post(analyze))
    .route("/api/deploy", post(deploy))
    .route("/api/rollback", post(rollback))
    .route("/api/deployment-history", get(history))
    .route("/api/metrics", get(metrics))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse {
    status: "healthy".to_string(),
    timestamp: Utc::now(),
    service: SERVICE_NAME.to_string(),
  })
}

pub async fn analyze(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<InboundAnalysis>, JsonRejection>,
) -> Result<Json<AnalysisResult>, GateError> {
  let Json(payload) = payload?;
  state.engine.analyze(&payload).await.map(Json)
}

pub async fn deploy(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<InboundDeploy>, JsonRejection>,
) -> Result<Json<DeploymentResponse>, GateError> {
  let Json(payload) = payload?;
  let record = state.engine.deploy(&payload).await?;
  Ok(Json(DeploymentResponse {
    message: "Deployment successful".to_string(),
    details: record,
  }))
}

pub async fn rollback(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<InboundRollback>, JsonRejection>,
) -> Result<Json<DeploymentResponse>, GateError> {
  let Json(payload) = payload?;
  let record = state.engine.rollback(&payload).await?;
  Ok(Json(DeploymentResponse {
    message: "Rollback successful".to_string(),
    details: record,
  }))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
  pub project: Option<String>,
  pub environment: Option<String>,
}

pub async fn history(
  State(state): State<Arc<AppState>>,
  Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
  let project = query
    .project
    .as_deref()
    .map(str::trim)
    .filter(|p| !p.is_empty());
  let environment = query
    .environment
    .as_deref()
    .filter(|e| !e.trim().is_empty())
    .map(Environment::from_str_loose);
  let deployments = state.engine.history_for(project, environment.as_ref());
  Json(HistoryResponse { deployments })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<SystemMetrics> {
  Json(state.engine.metrics())
}
