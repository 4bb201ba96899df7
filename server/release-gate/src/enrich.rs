//! Optional LLM enrichment of issues/recommendations.
//!
//! Additive only: the risk score and approval never depend on it. Every
//! failure here means "enrichment unavailable" and the caller keeps the
//! rule-table output.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;
/// Code beyond this many bytes is not sent to the model.
const MAX_CODE_BYTES: usize = 32 * 1024;

#[derive(Debug, Error)]
pub enum EnrichError {
  #[error("enrichment disabled: {0}")]
  Disabled(String),

  #[error("enrichment unreachable: {0}")]
  Unreachable(String),

  #[error("enrichment returned status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("enrichment output unparseable: {0}")]
  Unparseable(String),

  #[error("enrichment timed out after {0:?}")]
  TimedOut(Duration),
}

/// Extra prose from the model, appended after the rule-table strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Feedback {
  #[serde(default)]
  pub issues: Vec<String>,
  #[serde(default)]
  pub recommendations: Vec<String>,
}

#[async_trait]
pub trait Enricher: Send + Sync {
  async fn enrich(&self, code: &str) -> Result<Feedback, EnrichError>;
}

/// Parse model output into feedback. Tolerates a surrounding Markdown fence.
pub fn parse_feedback(text: &str) -> Result<Feedback, EnrichError> {
  let trimmed = text.trim();
  let body = match trimmed.strip_prefix("```") {
    Some(rest) => {
      let rest = rest.strip_prefix("json").unwrap_or(rest);
      rest.strip_suffix("```").unwrap_or(rest).trim()
    }
    None => trimmed,
  };
  serde_json::from_str(body).map_err(|e| EnrichError::Unparseable(e.to_string()))
}

fn compose_prompt(code: &str) -> String {
  let code = truncate(code, MAX_CODE_BYTES);
  format!(
    "You are an expert software reviewer integrated into a CI/CD system.\n\n\
     Given the following code change, provide:\n\
     1. A list of critical issues detected in the code (e.g. security risks, missing validation, error handling).\n\
     2. A list of actionable recommendations to improve the code before deployment.\n\n\
     Respond ONLY with a JSON object like:\n\
     {{\"issues\": [\"...\"], \"recommendations\": [\"...\"]}}\n\n\
     Code:\n```\n{}\n```\n",
    code
  )
}

fn truncate(s: &str, max: usize) -> &str {
  if s.len() <= max {
    return s;
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  &s[..end]
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
  #[serde(rename = "type")]
  content_type: String,
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
  content: Vec<AnthropicContent>,
}

/// Enrichment backed by the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicEnricher {
  client: Client,
  api_key: String,
  model: String,
  endpoint: String,
}

impl AnthropicEnricher {
  pub fn new(
    api_key: impl Into<String>,
    model: impl Into<String>,
    endpoint: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self, EnrichError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| EnrichError::Disabled(format!("failed to build HTTP client: {}", e)))?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      model: model.into(),
      endpoint: endpoint.into(),
    })
  }

  /// `None` when no API key is configured.
  pub fn from_config(config: &Config) -> Result<Option<Self>, EnrichError> {
    match &config.enrich_api_key {
      Some(key) => Self::new(
        key.clone(),
        config.enrich_model.clone(),
        config.enrich_endpoint.clone(),
        config.enrich_timeout,
      )
      .map(Some),
      None => Ok(None),
    }
  }
}

#[async_trait]
impl Enricher for AnthropicEnricher {
  async fn enrich(&self, code: &str) -> Result<Feedback, EnrichError> {
    let payload = json!({
      "model": self.model,
      "max_tokens": MAX_TOKENS,
      "temperature": 0,
      "messages": [
        {
          "role": "user",
          "content": compose_prompt(code),
        }
      ],
    });

    let response = self
      .client
      .post(&self.endpoint)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", ANTHROPIC_VERSION)
      .json(&payload)
      .send()
      .await
      .map_err(|e| EnrichError::Unreachable(e.to_string()))?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(EnrichError::Status {
        status,
        body: truncate(&body, 320).to_string(),
      });
    }

    let body: AnthropicResponse = response
      .json()
      .await
      .map_err(|e| EnrichError::Unparseable(format!("invalid response envelope: {}", e)))?;

    let text = body
      .content
      .iter()
      .filter(|part| part.content_type == "text")
      .filter_map(|part| part.text.as_deref())
      .collect::<Vec<_>>()
      .join("\n");

    parse_feedback(&text)
  }
}
