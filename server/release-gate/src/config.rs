//! Service configuration with sane defaults, overridable from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::GateError;

pub const DEFAULT_ENRICH_MODEL: &str = "claude-3-5-sonnet-latest";
pub const DEFAULT_ENRICH_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Tunables for the gate, the simulator and the HTTP shell.
#[derive(Debug, Clone)]
pub struct Config {
  /// Address the HTTP server binds to.
  pub listen_addr: SocketAddr,
  /// Modeled duration of each deploy phase.
  pub deploy_phase: Duration,
  /// Modeled duration of each rollback phase.
  pub rollback_phase: Duration,
  /// Modeled analysis latency, paid only on a cache miss.
  pub analysis_delay: Duration,
  /// Upper bound on one enrichment call before falling back to the rule table.
  pub enrich_timeout: Duration,
  /// Enrichment is disabled when no key is configured.
  pub enrich_api_key: Option<String>,
  pub enrich_model: String,
  pub enrich_endpoint: String,
  /// Default log filter when `RUST_LOG` is unset.
  pub log_level: String,
  pub log_json: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
      deploy_phase: Duration::from_millis(500),
      rollback_phase: Duration::from_millis(300),
      analysis_delay: Duration::ZERO,
      enrich_timeout: Duration::from_millis(5000),
      enrich_api_key: None,
      enrich_model: DEFAULT_ENRICH_MODEL.to_string(),
      enrich_endpoint: DEFAULT_ENRICH_ENDPOINT.to_string(),
      log_level: "info".to_string(),
      log_json: false,
    }
  }
}

impl Config {
  /// Load from process environment variables.
  pub fn from_env() -> Result<Self, GateError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Load from an arbitrary key lookup; unset keys keep their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, GateError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();

    if let Some(addr) = lookup("RELEASE_GATE_ADDR") {
      config.listen_addr = addr
        .parse()
        .map_err(|e| GateError::config(format!("RELEASE_GATE_ADDR: {}", e)))?;
    }
    if let Some(v) = lookup("RELEASE_GATE_DEPLOY_PHASE_MS") {
      config.deploy_phase = parse_millis("RELEASE_GATE_DEPLOY_PHASE_MS", &v)?;
    }
    if let Some(v) = lookup("RELEASE_GATE_ROLLBACK_PHASE_MS") {
      config.rollback_phase = parse_millis("RELEASE_GATE_ROLLBACK_PHASE_MS", &v)?;
    }
    if let Some(v) = lookup("RELEASE_GATE_ANALYSIS_DELAY_MS") {
      config.analysis_delay = parse_millis("RELEASE_GATE_ANALYSIS_DELAY_MS", &v)?;
    }
    if let Some(v) = lookup("RELEASE_GATE_ENRICH_TIMEOUT_MS") {
      config.enrich_timeout = parse_millis("RELEASE_GATE_ENRICH_TIMEOUT_MS", &v)?;
    }

    config.enrich_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
    if let Some(model) = lookup("RELEASE_GATE_ENRICH_MODEL") {
      config.enrich_model = model;
    }
    if let Some(endpoint) = lookup("RELEASE_GATE_ENRICH_ENDPOINT") {
      config.enrich_endpoint = endpoint;
    }
    if let Some(level) = lookup("RELEASE_GATE_LOG") {
      config.log_level = level;
    }
    if let Some(json) = lookup("RELEASE_GATE_LOG_JSON") {
      config.log_json = matches!(json.as_str(), "1" | "true" | "yes");
    }

    Ok(config)
  }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration, GateError> {
  value
    .trim()
    .parse::<u64>()
    .map(Duration::from_millis)
    .map_err(|e| GateError::config(format!("{}: expected milliseconds: {}", key, e)))
}
