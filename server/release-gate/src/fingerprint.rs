//! Content fingerprint keying the analysis cache.

use crate::types::{Environment, Fingerprint};

/// Fingerprint a (code change, environment) pair.
///
/// The code is length-framed so no split of the same bytes between the two
/// parts can collide. Uses blake3 for a fast, deterministic hash.
pub fn compute(code: &str, environment: &Environment) -> Fingerprint {
  let mut hasher = blake3::Hasher::new();
  hasher.update(&(code.len() as u64).to_le_bytes());
  hasher.update(code.as_bytes());
  hasher.update(b"|");
  hasher.update(environment.as_str().as_bytes());

  // First 16 bytes (32 hex chars): compact, still collision-resistant for a cache key.
  let hex = hasher.finalize().to_hex();
  Fingerprint(hex[..32].to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_input_same_fingerprint() {
    let a = compute("let x = 1;", &Environment::Staging);
    let b = compute("let x = 1;", &Environment::Staging);
    assert_eq!(a, b);
  }

  #[test]
  fn environment_changes_fingerprint() {
    let a = compute("let x = 1;", &Environment::Staging);
    let b = compute("let x = 1;", &Environment::Production);
    assert_ne!(a, b);
  }

  #[test]
  fn aliases_share_a_fingerprint() {
    let a = compute("x", &Environment::from_str_loose("prod"));
    let b = compute("x", &Environment::from_str_loose("production"));
    assert_eq!(a, b);
  }

  #[test]
  fn boundary_shift_changes_fingerprint() {
    let a = compute("ab", &Environment::Other("c".into()));
    let b = compute("a", &Environment::Other("bc".into()));
    assert_ne!(a, b);
  }

  #[test]
  fn fingerprint_is_32_hex_chars() {
    let fp = compute("", &Environment::Development);
    assert_eq!(fp.0.len(), 32);
    assert!(fp.0.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
