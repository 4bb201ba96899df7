//! Security/quality signals derived from lexical patterns in the code change.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::types::PatternSignals;

fn case_insensitive(pattern: &str) -> Regex {
  RegexBuilder::new(pattern)
    .case_insensitive(true)
    .build()
    .expect("signal pattern is a valid regex")
}

fn case_sensitive(pattern: &str) -> Regex {
  Regex::new(pattern).expect("signal pattern is a valid regex")
}

static VALIDATION: LazyLock<Regex> =
  LazyLock::new(|| case_insensitive(r"if\s*\(\s*!|\bvalidate\b|\bcheck\b"));
static ERROR_HANDLING: LazyLock<Regex> =
  LazyLock::new(|| case_insensitive(r"\btry\b|\bcatch\b|\berror\b|\bexcept\b"));
static AUTH: LazyLock<Regex> =
  LazyLock::new(|| case_insensitive(r"\bauth\b|\btoken\b|\bjwt\b|\bbearer\b"));
// Structural, so case matters: `query +`, or a query/execute call whose arguments concatenate.
static SQL_INJECTION: LazyLock<Regex> =
  LazyLock::new(|| case_sensitive(r"query\s*\+|(?:query|execute)\s*\(.*\+"));
static HARDCODED_SECRET: LazyLock<Regex> =
  LazyLock::new(|| case_insensitive(r"password\s*=|api_key\s*=|secret\s*="));
static PAYMENT: LazyLock<Regex> =
  LazyLock::new(|| case_insensitive(r"\bpayment\b|\bcharge\b|\bamount\b|\btransaction\b"));
static DATABASE: LazyLock<Regex> = LazyLock::new(|| {
  case_insensitive(r"\bdb\.\b|\bquery\b|\bfindOne\b|\binsert\b|\bupdate\b")
});

/// Evaluate every signal against the text. Total: never fails, no state.
pub fn detect(code: &str) -> PatternSignals {
  PatternSignals {
    has_validation: VALIDATION.is_match(code),
    has_error_handling: ERROR_HANDLING.is_match(code),
    has_auth: AUTH.is_match(code),
    has_sql_injection_risk: SQL_INJECTION.is_match(code),
    has_hardcoded_secrets: HARDCODED_SECRET.is_match(code),
    is_payment_code: PAYMENT.is_match(code),
    has_database_ops: DATABASE.is_match(code),
  }
}
