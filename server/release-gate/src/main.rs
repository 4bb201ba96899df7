//! Binary entrypoint for the release gate HTTP service.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use release_gate::{router, AppState, Config, Engine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config = Config::from_env()?;
  init_tracing(&config);

  let addr = config.listen_addr;
  let engine = Engine::from_config(config)?;
  if engine.config().enrich_api_key.is_none() {
    info!("no ANTHROPIC_API_KEY set; enrichment disabled");
  }

  let state = Arc::new(AppState { engine });
  let app = router(state);

  info!("release-gate listening on http://{}", addr);
  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

fn init_tracing(config: &Config) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
  let registry = tracing_subscriber::registry().with(filter);
  if config.log_json {
    registry.with(tracing_subscriber::fmt::layer().json()).init();
  } else {
    registry.with(tracing_subscriber::fmt::layer()).init();
  }
}
