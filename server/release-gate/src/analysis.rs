//! The analysis pipeline: detect → complexity → score → approve → explain.

use crate::approval;
use crate::complexity;
use crate::detect;
use crate::score;
use crate::types::{AnalysisResult, Environment};

/// Analyze one code change for one environment. Pure: same input, same result.
pub fn analyze(code: &str, environment: &Environment) -> AnalysisResult {
  let signals = detect::detect(code);
  let complexity = complexity::complexity(code);
  let scores = score::score(&signals, environment, complexity);
  let approved = approval::approve(scores.risk_score, environment);

  AnalysisResult {
    risk_score: scores.risk_score,
    test_coverage: scores.test_coverage,
    complexity_score: scores.complexity_score,
    security_score: scores.security_score,
    approved,
    issues: approval::compute_issues(&signals, scores.risk_score),
    recommendations: approval::compute_recommendations(&signals, approved),
  }
}
