//! Risk, security and estimated-coverage scores.

use crate::types::{Environment, PatternSignals};

/// Every change starts here before adjustments.
pub const BASE_RISK: i32 = 3;

/// Scores for one analysis, all bounded to their documented ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
  pub risk_score: u8,
  pub security_score: u8,
  pub test_coverage: u8,
  pub complexity_score: u8,
}

/// Unclamped risk: base plus every matching adjustment.
pub fn raw_risk(signals: &PatternSignals, environment: &Environment) -> i32 {
  let mut score = BASE_RISK;
  score += match environment {
    Environment::Production => 2,
    Environment::Staging => 1,
    _ => 0,
  };
  if signals.is_payment_code {
    score += 1;
  }
  if !signals.has_validation {
    score += 2;
  }
  if !signals.has_error_handling {
    score += 1;
  }
  if signals.has_sql_injection_risk {
    score += 3;
  }
  if signals.has_hardcoded_secrets {
    score += 2;
  }
  if signals.is_payment_code && !signals.has_auth {
    score += 2;
  }
  if signals.has_database_ops {
    score += 1;
  }
  score
}

/// Risk 1–10.
pub fn risk_score(signals: &PatternSignals, environment: &Environment) -> u8 {
  raw_risk(signals, environment).clamp(1, 10) as u8
}

/// 10 minus one per absent signal, floored at 1.
pub fn security_score(signals: &PatternSignals) -> u8 {
  (10 - signals.false_count() as i32).max(1) as u8
}

/// Estimated (not measured) coverage: 95 minus 5 per risk point, floored at 60.
pub fn test_coverage(risk_score: u8) -> u8 {
  (95 - 5 * risk_score as i32).clamp(60, 95) as u8
}

pub fn score(signals: &PatternSignals, environment: &Environment, complexity: u8) -> Scores {
  let risk_score = risk_score(signals, environment);
  Scores {
    risk_score,
    security_score: security_score(signals),
    test_coverage: test_coverage(risk_score),
    complexity_score: complexity.clamp(1, 10),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn safe() -> PatternSignals {
    PatternSignals {
      has_validation: true,
      has_error_handling: true,
      ..PatternSignals::default()
    }
  }

  #[test]
  fn clean_change_scores_base_plus_environment() {
    assert_eq!(risk_score(&safe(), &Environment::Development), 3);
    assert_eq!(risk_score(&safe(), &Environment::Staging), 4);
    assert_eq!(risk_score(&safe(), &Environment::Production), 5);
    assert_eq!(risk_score(&safe(), &Environment::Other("qa".into())), 3);
  }

  #[test]
  fn unprotected_payment_code_adds_three() {
    let signals = PatternSignals {
      is_payment_code: true,
      ..safe()
    };
    assert_eq!(raw_risk(&signals, &Environment::Development), 6);
    let with_auth = PatternSignals {
      has_auth: true,
      ..signals
    };
    assert_eq!(raw_risk(&with_auth, &Environment::Development), 4);
  }

  #[test]
  fn adjustments_accumulate_then_clamp() {
    let signals = PatternSignals {
      has_sql_injection_risk: true,
      has_hardcoded_secrets: true,
      has_database_ops: true,
      ..PatternSignals::default()
    };
    // 3 + 2 + 1 + 3 + 2 + 1 + 2 (production)
    assert_eq!(raw_risk(&signals, &Environment::Production), 14);
    assert_eq!(risk_score(&signals, &Environment::Production), 10);
  }

  #[test]
  fn security_score_drops_one_per_absent_signal() {
    assert_eq!(security_score(&PatternSignals::default()), 3);
    let all = PatternSignals {
      has_validation: true,
      has_error_handling: true,
      has_auth: true,
      has_sql_injection_risk: true,
      has_hardcoded_secrets: true,
      is_payment_code: true,
      has_database_ops: true,
    };
    assert_eq!(security_score(&all), 10);
    let one_missing = PatternSignals {
      has_auth: false,
      ..all
    };
    assert_eq!(security_score(&one_missing), 9);
  }

  #[test]
  fn coverage_estimate_is_bounded() {
    assert_eq!(test_coverage(1), 90);
    assert_eq!(test_coverage(3), 80);
    assert_eq!(test_coverage(7), 60);
    assert_eq!(test_coverage(10), 60);
  }

  #[test]
  fn complexity_passes_through_clamped() {
    assert_eq!(score(&safe(), &Environment::Staging, 0).complexity_score, 1);
    assert_eq!(score(&safe(), &Environment::Staging, 7).complexity_score, 7);
  }
}
