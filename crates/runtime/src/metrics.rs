use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    predictions: AtomicU64,
    model_direct: AtomicU64,
    model_encoded: AtomicU64,
    fallback_estimates: AtomicU64,
    dispatch_failures: AtomicU64,
    advisories: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_predictions(&self, delta: u64) {
        self.inner.predictions.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_model_direct(&self, delta: u64) {
        self.inner.model_direct.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_model_encoded(&self, delta: u64) {
        self.inner.model_encoded.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_fallback_estimates(&self, delta: u64) {
        self.inner.fallback_estimates.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_dispatch_failures(&self, delta: u64) {
        self.inner.dispatch_failures.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_advisories(&self, delta: u64) {
        self.inner.advisories.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions: self.inner.predictions.load(Ordering::Relaxed),
            model_direct: self.inner.model_direct.load(Ordering::Relaxed),
            model_encoded: self.inner.model_encoded.load(Ordering::Relaxed),
            fallback_estimates: self.inner.fallback_estimates.load(Ordering::Relaxed),
            dispatch_failures: self.inner.dispatch_failures.load(Ordering::Relaxed),
            advisories: self.inner.advisories.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub model_direct: u64,
    pub model_encoded: u64,
    pub fallback_estimates: u64,
    pub dispatch_failures: u64,
    pub advisories: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Line {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsRegistry::default();
        let handle = metrics.clone();
        handle.inc_predictions(2);
        handle.inc_fallback_estimates(1);
        metrics.inc_advisories(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.predictions, 2);
        assert_eq!(snap.fallback_estimates, 1);
        assert_eq!(snap.advisories, 3);
        assert_eq!(snap.model_direct, 0);
    }

    #[test]
    fn json_line_is_flat() {
        let metrics = MetricsRegistry::default();
        metrics.inc_model_encoded(1);
        let line = metrics
            .snapshot()
            .to_json_line("eta_demo", Some(Duration::from_millis(7)));
        let v: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(v["label"], "eta_demo");
        assert_eq!(v["model_encoded"], 1);
        assert_eq!(v["elapsed_ms"], 7);
    }
}
