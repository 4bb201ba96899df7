//! Release Gate: deterministic, rule-based deployment gating.
//!
//! Scores a code change's risk from lexical signals, approves or denies it
//! per environment, memoizes verdicts by content fingerprint, and records
//! simulated deploys/rollbacks in an append-only ledger.
//!
//! No DB; in-memory state for the process lifetime. The optional LLM
//! enrichment never affects the verdict.

pub mod analysis;
pub mod approval;
pub mod cache;
pub mod complexity;
pub mod config;
pub mod deploy;
pub mod detect;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod fingerprint;
pub mod handlers;
pub mod ledger;
pub mod normalize;
pub mod score;
pub mod state;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::GateError;
pub use handlers::router;
pub use state::AppState;
pub use types::{AnalysisResult, DeploymentRecord, Environment};
