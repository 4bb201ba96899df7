//! Bounded complexity estimate from surface line and keyword counts.

use regex::Regex;
use std::sync::LazyLock;

static FUNCTIONS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bdef\b|\bfunction\b|\basync\s+def\b").expect("valid keyword regex")
});
static CONDITIONALS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bif\b|\belse\b|\belif\b|\bswitch\b").expect("valid keyword regex")
});
static LOOPS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bfor\b|\bwhile\b|\bforeach\b").expect("valid keyword regex"));

/// Surface counts feeding the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
  pub lines: usize,
  pub functions: usize,
  pub conditionals: usize,
  pub loops: usize,
}

pub fn count(code: &str) -> Counts {
  Counts {
    // Segments split on '\n': an empty text is one line.
    lines: code.split('\n').count(),
    functions: FUNCTIONS.find_iter(code).count(),
    conditionals: CONDITIONALS.find_iter(code).count(),
    loops: LOOPS.find_iter(code).count(),
  }
}

/// Complexity 1–10: lines/20 + 2·functions + conditionals + loops, clamped.
pub fn complexity(code: &str) -> u8 {
  let c = count(code);
  let raw = c.lines / 20 + c.functions * 2 + c.conditionals + c.loops;
  raw.clamp(1, 10) as u8
}
