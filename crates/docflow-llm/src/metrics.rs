//! In-process provider call metrics
//!
//! Every call through [`crate::ObservedProvider`] bumps a counter and a
//! latency histogram keyed by provider, operation, status and error
//! category. The registry renders itself in the Prometheus text exposition
//! format; nothing here listens on a socket.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Upper bounds of the duration histogram, in seconds
pub const DURATION_BUCKETS_SECONDS: [f64; 11] =
    [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Error category recorded for successful calls
pub const NO_ERROR_CATEGORY: &str = "none";

const REQUESTS_METRIC: &str = "docflow_provider_requests_total";
const DURATION_METRIC: &str = "docflow_provider_request_duration_seconds";

static GLOBAL: Lazy<ProviderMetrics> = Lazy::new(ProviderMetrics::default);

/// Label set of one provider call series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderCallKey {
    pub provider: String,
    pub operation: String,
    pub status: String,
    pub error_category: String,
}

impl ProviderCallKey {
    fn labels(&self) -> String {
        format!(
            "provider=\"{}\",operation=\"{}\",status=\"{}\",error_category=\"{}\"",
            escape_label_value(&self.provider),
            escape_label_value(&self.operation),
            escape_label_value(&self.status),
            escape_label_value(&self.error_category),
        )
    }
}

/// Call count and latency histogram of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStats {
    pub count: u64,
    pub sum_seconds: f64,
    /// Non-cumulative hits per entry of [`DURATION_BUCKETS_SECONDS`]
    pub bucket_counts: [u64; DURATION_BUCKETS_SECONDS.len()],
}

impl Default for CallStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum_seconds: 0.0,
            bucket_counts: [0; DURATION_BUCKETS_SECONDS.len()],
        }
    }
}

impl CallStats {
    fn observe(&mut self, seconds: f64) {
        self.count += 1;
        self.sum_seconds += seconds;
        if let Some(idx) = DURATION_BUCKETS_SECONDS
            .iter()
            .position(|upper| seconds <= *upper)
        {
            self.bucket_counts[idx] += 1;
        }
    }
}

/// Shared, cloneable registry of provider call metrics.
#[derive(Debug, Clone, Default)]
pub struct ProviderMetrics {
    series: Arc<Mutex<BTreeMap<ProviderCallKey, CallStats>>>,
}

impl ProviderMetrics {
    /// The process-wide registry used by default.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ProviderCallKey, CallStats>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one finished provider call.
    pub fn record(
        &self,
        provider: &str,
        operation: &str,
        status: &str,
        error_category: &str,
        duration: Duration,
    ) {
        let key = ProviderCallKey {
            provider: provider.to_string(),
            operation: operation.to_string(),
            status: status.to_string(),
            error_category: error_category.to_string(),
        };
        self.lock()
            .entry(key)
            .or_default()
            .observe(duration.as_secs_f64());
    }

    /// Copy of every series, ordered by label set.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ProviderCallKey, CallStats)> {
        self.lock()
            .iter()
            .map(|(key, stats)| (key.clone(), stats.clone()))
            .collect()
    }

    /// Number of calls recorded across all series.
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.lock().values().map(|stats| stats.count).sum()
    }

    /// Render every series in the Prometheus text exposition format.
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let series = self.snapshot();
        let mut out = String::new();

        let _ = writeln!(out, "# HELP {REQUESTS_METRIC} Total provider requests.");
        let _ = writeln!(out, "# TYPE {REQUESTS_METRIC} counter");
        for (key, stats) in &series {
            let _ = writeln!(out, "{REQUESTS_METRIC}{{{}}} {}", key.labels(), stats.count);
        }

        let _ = writeln!(
            out,
            "# HELP {DURATION_METRIC} Provider request duration in seconds."
        );
        let _ = writeln!(out, "# TYPE {DURATION_METRIC} histogram");
        for (key, stats) in &series {
            let labels = key.labels();
            let mut cumulative = 0;
            for (upper, hits) in DURATION_BUCKETS_SECONDS.iter().zip(stats.bucket_counts) {
                cumulative += hits;
                let _ = writeln!(
                    out,
                    "{DURATION_METRIC}_bucket{{{labels},le=\"{upper}\"}} {cumulative}"
                );
            }
            let _ = writeln!(
                out,
                "{DURATION_METRIC}_bucket{{{labels},le=\"+Inf\"}} {}",
                stats.count
            );
            let _ = writeln!(out, "{DURATION_METRIC}_sum{{{labels}}} {}", stats.sum_seconds);
            let _ = writeln!(out, "{DURATION_METRIC}_count{{{labels}}} {}", stats.count);
        }

        out
    }
}

fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
