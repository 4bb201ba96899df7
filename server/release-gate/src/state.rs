//! Shared application state for the HTTP handlers.

use crate::engine::Engine;

pub struct AppState {
  pub engine: Engine,
}
