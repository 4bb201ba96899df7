//! Approval rule and the issue/recommendation table that explains it.

use crate::types::{Environment, PatternSignals};

/// Highest risk approved outside production.
pub const MAX_RISK: u8 = 6;
/// Production gets a strictly tighter ceiling.
pub const MAX_RISK_PRODUCTION: u8 = 5;
/// Above this the change is flagged as hard to maintain.
pub const HIGH_RISK_ISSUE_THRESHOLD: u8 = 7;

pub fn approve(risk_score: u8, environment: &Environment) -> bool {
  risk_score <= MAX_RISK && (!environment.is_production() || risk_score <= MAX_RISK_PRODUCTION)
}

/// Issues, in a fixed order.
pub fn compute_issues(signals: &PatternSignals, risk_score: u8) -> Vec<String> {
  let rules: [(bool, &str); 6] = [
    (
      !signals.has_validation,
      "Missing input validation - potential security vulnerability",
    ),
    (
      !signals.has_error_handling,
      "Insufficient error handling - may cause application crashes",
    ),
    (
      signals.has_sql_injection_risk,
      "Potential SQL injection vulnerability detected",
    ),
    (
      signals.has_hardcoded_secrets,
      "Hardcoded secrets found - security risk",
    ),
    (
      signals.is_payment_code && !signals.has_auth,
      "Payment endpoint lacks proper authentication",
    ),
    (
      risk_score > HIGH_RISK_ISSUE_THRESHOLD,
      "High complexity code - difficult to maintain and test",
    ),
  ];
  collect(&rules)
}

/// Recommendations, in a fixed order; the last ones depend on the verdict.
pub fn compute_recommendations(signals: &PatternSignals, approved: bool) -> Vec<String> {
  let rules: [(bool, &str); 8] = [
    (
      !signals.has_validation,
      "Add comprehensive input validation to prevent malicious data",
    ),
    (
      !signals.has_error_handling,
      "Implement proper error handling and logging",
    ),
    (
      signals.has_sql_injection_risk,
      "Use parameterized queries to prevent SQL injection",
    ),
    (
      signals.has_hardcoded_secrets,
      "Move secrets to environment variables or secure vault",
    ),
    (
      signals.is_payment_code && !signals.has_auth,
      "Add authentication middleware for payment endpoints",
    ),
    (
      approved,
      "Consider adding integration tests for critical paths",
    ),
    (
      approved,
      "Monitor error rates and performance post-deployment",
    ),
    (
      !approved,
      "Address security issues before attempting deployment",
    ),
  ];
  collect(&rules)
}

fn collect(rules: &[(bool, &str)]) -> Vec<String> {
  rules
    .iter()
    .filter(|(applies, _)| *applies)
    .map(|(_, text)| text.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn production_ceiling_is_tighter() {
    assert!(approve(6, &Environment::Staging));
    assert!(!approve(6, &Environment::Production));
    assert!(approve(5, &Environment::Production));
    assert!(!approve(7, &Environment::Development));
    assert!(approve(6, &Environment::Other("qa".into())));
  }

  #[test]
  fn clean_approved_change_gets_monitoring_advice_only() {
    let signals = PatternSignals {
      has_validation: true,
      has_error_handling: true,
      ..PatternSignals::default()
    };
    assert!(compute_issues(&signals, 3).is_empty());
    assert_eq!(
      compute_recommendations(&signals, true),
      vec![
        "Consider adding integration tests for critical paths".to_string(),
        "Monitor error rates and performance post-deployment".to_string(),
      ]
    );
  }

  #[test]
  fn sql_risk_maps_to_issue_and_recommendation() {
    let signals = PatternSignals {
      has_validation: true,
      has_error_handling: true,
      has_sql_injection_risk: true,
      ..PatternSignals::default()
    };
    let issues = compute_issues(&signals, 6);
    assert_eq!(issues, vec!["Potential SQL injection vulnerability detected".to_string()]);
    let recs = compute_recommendations(&signals, false);
    assert_eq!(recs[0], "Use parameterized queries to prevent SQL injection");
    assert_eq!(
      recs.last().map(String::as_str),
      Some("Address security issues before attempting deployment")
    );
  }

  #[test]
  fn high_risk_adds_maintainability_issue() {
    let signals = PatternSignals::default();
    let issues = compute_issues(&signals, 8);
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0], "Missing input validation - potential security vulnerability");
    assert_eq!(issues[2], "High complexity code - difficult to maintain and test");
    assert_eq!(compute_issues(&signals, 7).len(), 2);
  }
}
