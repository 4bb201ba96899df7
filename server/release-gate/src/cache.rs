//! Content-addressed memoization of analysis results.
//!
//! Each fingerprint owns a once-cell. Concurrent misses on the same
//! fingerprint await a single computation instead of racing. Entries are
//! never evicted.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::fingerprint;
use crate::types::{AnalysisResult, Environment, Fingerprint};

#[derive(Debug, Default)]
pub struct AnalysisCache {
  entries: Mutex<HashMap<Fingerprint, Arc<OnceCell<AnalysisResult>>>>,
}

impl AnalysisCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the cached result for (code, environment), computing it at most once.
  ///
  /// If the computing caller is dropped mid-flight the cell stays empty and the
  /// next waiter takes over the computation.
  pub async fn get_or_compute<F, Fut>(
    &self,
    code: &str,
    environment: &Environment,
    compute: F,
  ) -> AnalysisResult
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = AnalysisResult>,
  {
    let fp = fingerprint::compute(code, environment);
    let cell = {
      let mut entries = self.entries.lock();
      Arc::clone(entries.entry(fp.clone()).or_default())
    };

    if let Some(hit) = cell.get() {
      debug!(fingerprint = %fp.0, "analysis cache hit");
      return hit.clone();
    }

    cell
      .get_or_init(|| {
        debug!(fingerprint = %fp.0, %environment, "analysis cache miss");
        compute()
      })
      .await
      .clone()
  }

  pub fn get(&self, fp: &Fingerprint) -> Option<AnalysisResult> {
    let entries = self.entries.lock();
    entries.get(fp).and_then(|cell| cell.get().cloned())
  }

  /// Number of completed entries (in-flight computations excluded).
  pub fn len(&self) -> usize {
    let entries = self.entries.lock();
    entries.values().filter(|cell| cell.initialized()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analysis;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  #[tokio::test]
  async fn second_call_does_not_recompute() {
    let cache = AnalysisCache::new();
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let env = &Environment::Staging;

    let compute = || async move {
      calls.fetch_add(1, Ordering::SeqCst);
      analysis::analyze("if (!x) {}", env)
    };
    let first = cache.get_or_compute("if (!x) {}", env, compute).await;
    let second = cache.get_or_compute("if (!x) {}", env, compute).await;

    assert_eq!(first, second);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
  }

  #[tokio::test]
  async fn environments_are_cached_separately() {
    let cache = AnalysisCache::new();
    let counter = AtomicUsize::new(0);
    for env in [Environment::Staging, Environment::Production, Environment::Staging] {
      let calls = &counter;
      let env = &env;
      cache
        .get_or_compute("x", env, || async move {
          calls.fetch_add(1, Ordering::SeqCst);
          analysis::analyze("x", env)
        })
        .await;
    }
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn concurrent_misses_compute_once() {
    let cache = Arc::new(AnalysisCache::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..16 {
      let cache = Arc::clone(&cache);
      let calls = Arc::clone(&calls);
      handles.push(tokio::spawn(async move {
        cache
          .get_or_compute("query + x", &Environment::Production, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            analysis::analyze("query + x", &Environment::Production)
          })
          .await
      }));
    }

    let mut results = Vec::new();
    for handle in handles {
      results.push(handle.await.unwrap());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
  }

  #[tokio::test]
  async fn get_by_fingerprint() {
    let cache = AnalysisCache::new();
    let env = Environment::Development;
    assert!(cache.is_empty());
    let result = cache
      .get_or_compute("x", &env, || async { analysis::analyze("x", &Environment::Development) })
      .await;
    let fp = fingerprint::compute("x", &env);
    assert_eq!(cache.get(&fp), Some(result));
  }
}
