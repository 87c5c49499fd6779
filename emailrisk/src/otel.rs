// Prometheus-text metrics exporter — Phase 5.
//
// Generalizes `GlasswallMetrics`/`MetricsServer` from campaign/cluster
// gauges to the fields this service's observability sink cares about:
// decisions by outcome, a risk-score histogram, and request latency.
//
// Prometheus endpoint: GET /metrics (served from the axum router, see
// `http::mod`, rather than the teacher's hand-rolled raw-TCP server —
// one HTTP surface for the whole service is simpler than two).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct Metrics {
    pub requests_total: AtomicU64,
    pub decisions_allow: AtomicU64,
    pub decisions_warn: AtomicU64,
    pub decisions_block: AtomicU64,
    pub risk_score_buckets: [AtomicU64; 10],
    pub latency_sum_ms: AtomicU64,
    pub latency_count: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests_total: AtomicU64::new(0),
            decisions_allow: AtomicU64::new(0),
            decisions_warn: AtomicU64::new(0),
            decisions_block: AtomicU64::new(0),
            risk_score_buckets: Default::default(),
            latency_sum_ms: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
        })
    }

    pub fn record_decision(&self, decision: &str) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        match decision {
            "allow" => self.decisions_allow.fetch_add(1, Ordering::Relaxed),
            "warn" => self.decisions_warn.fetch_add(1, Ordering::Relaxed),
            "block" => self.decisions_block.fetch_add(1, Ordering::Relaxed),
            _ => 0,
        };
    }

    pub fn record_risk_score(&self, score: f64) {
        let bucket = ((score / 0.1) as usize).min(9);
        self.risk_score_buckets[bucket].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_latency(&self, latency_ms: u64) {
        self.latency_sum_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Render metrics in Prometheus text exposition format.
    pub fn prometheus_text(&self) -> String {
        let mut out = String::with_capacity(2048);

        macro_rules! counter {
            ($name:expr, $help:expr, $val:expr) => {
                out.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
                    $name, $help, $name, $name, $val
                ));
            };
        }

        counter!(
            "emailrisk_requests_total",
            "Total validation requests processed",
            self.requests_total.load(Ordering::Relaxed)
        );

        out.push_str("# HELP emailrisk_decisions_total Decisions by outcome\n");
        out.push_str("# TYPE emailrisk_decisions_total counter\n");
        out.push_str(&format!(
            "emailrisk_decisions_total{{decision=\"allow\"}} {}\n",
            self.decisions_allow.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "emailrisk_decisions_total{{decision=\"warn\"}} {}\n",
            self.decisions_warn.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "emailrisk_decisions_total{{decision=\"block\"}} {}\n",
            self.decisions_block.load(Ordering::Relaxed)
        ));

        out.push_str("# HELP emailrisk_risk_score_bucket Risk score distribution (0.1-wide buckets)\n");
        out.push_str("# TYPE emailrisk_risk_score_bucket counter\n");
        for (i, bucket) in self.risk_score_buckets.iter().enumerate() {
            out.push_str(&format!(
                "emailrisk_risk_score_bucket{{le=\"{:.1}\"}} {}\n",
                (i + 1) as f64 * 0.1,
                bucket.load(Ordering::Relaxed)
            ));
        }

        let count = self.latency_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_ms.load(Ordering::Relaxed);
        let mean = if count > 0 { sum as f64 / count as f64 } else { 0.0 };
        out.push_str("# HELP emailrisk_latency_ms_mean Mean request latency in milliseconds\n");
        out.push_str("# TYPE emailrisk_latency_ms_mean gauge\n");
        out.push_str(&format!("emailrisk_latency_ms_mean {mean:.3}\n"));

        out
    }

    pub fn snapshot(&self) -> HashMap<&'static str, u64> {
        [
            ("requests_total", self.requests_total.load(Ordering::Relaxed)),
            ("decisions_allow", self.decisions_allow.load(Ordering::Relaxed)),
            ("decisions_warn", self.decisions_warn.load(Ordering::Relaxed)),
            ("decisions_block", self.decisions_block.load(Ordering::Relaxed)),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_decisions_by_outcome() {
        let metrics = Metrics::new();
        metrics.record_decision("block");
        metrics.record_decision("allow");
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot["decisions_block"], 1);
        assert_eq!(snapshot["decisions_allow"], 1);
        assert_eq!(snapshot["requests_total"], 2);
    }

    #[test]
    fn prometheus_text_contains_expected_metric_names() {
        let metrics = Metrics::new();
        metrics.record_decision("warn");
        let text = metrics.prometheus_text();
        assert!(text.contains("emailrisk_requests_total"));
        assert!(text.contains("emailrisk_decisions_total"));
    }
}
