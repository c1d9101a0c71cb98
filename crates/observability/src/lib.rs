use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Process-wide planner counters. Every increment is also forwarded to the
/// `metrics` facade so an installed exporter sees the same numbers.
#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    rejected_total: AtomicU64,
    model_plans_total: AtomicU64,
    fallback_total: AtomicU64,
    fallback_malformed_total: AtomicU64,
    fallback_upstream_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub rejected_total: u64,
    pub model_plans_total: u64,
    pub fallback_total: u64,
    pub fallback_malformed_total: u64,
    pub fallback_upstream_total: u64,
    pub avg_latency_millis: f64,
}

/// Why a plan came from the synthesizer instead of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Malformed,
    Upstream,
}

impl FallbackReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed_response",
            Self::Upstream => "upstream_call_failure",
        }
    }
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("safar_requests_total").increment(1);
    }

    pub fn inc_rejected(&self) {
        self.rejected_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("safar_rejected_total").increment(1);
    }

    pub fn inc_model_plan(&self) {
        self.model_plans_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("safar_model_plans_total").increment(1);
    }

    pub fn inc_fallback(&self, reason: FallbackReason) {
        self.fallback_total.fetch_add(1, Ordering::Relaxed);
        let bucket = match reason {
            FallbackReason::Malformed => &self.fallback_malformed_total,
            FallbackReason::Upstream => &self.fallback_upstream_total,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("safar_fallback_total", "reason" => reason.as_str()).increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        metrics::histogram!("safar_plan_latency_seconds").record(duration.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let model_plans = self.model_plans_total.load(Ordering::Relaxed);
        let fallbacks = self.fallback_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);
        // Latency is only observed for generated plans, not rejections.
        let generated = model_plans + fallbacks;

        MetricsSnapshot {
            requests_total: requests,
            rejected_total: self.rejected_total.load(Ordering::Relaxed),
            model_plans_total: model_plans,
            fallback_total: fallbacks,
            fallback_malformed_total: self.fallback_malformed_total.load(Ordering::Relaxed),
            fallback_upstream_total: self.fallback_upstream_total.load(Ordering::Relaxed),
            avg_latency_millis: if generated == 0 {
                0.0
            } else {
                latency as f64 / generated as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,safar_api=info,safar_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
