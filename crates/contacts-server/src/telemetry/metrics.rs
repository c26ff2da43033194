// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::sync::Mutex;

pub(crate) const METRIC_PREFIX: &str = "contacts";

/// Upper bounds, in seconds, of the request latency histogram.
const LATENCY_BUCKETS_SECONDS: [f64; 10] = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0];

#[derive(Debug, Default, Clone)]
struct LatencyHistogram {
    buckets: [u64; LATENCY_BUCKETS_SECONDS.len()],
    count: u64,
    sum_seconds: f64,
}

impl LatencyHistogram {
    fn observe(&mut self, latency: Duration) {
        let seconds = latency.as_secs_f64();
        for (slot, bound) in self.buckets.iter_mut().zip(LATENCY_BUCKETS_SECONDS) {
            if seconds <= bound {
                *slot += 1;
            }
        }
        self.count += 1;
        self.sum_seconds += seconds;
    }
}

#[derive(Default)]
pub(crate) struct RequestMetrics {
    counts: Mutex<BTreeMap<(String, String, u16), u64>>,
    latency: Mutex<BTreeMap<String, LatencyHistogram>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(
        &self,
        method: &str,
        route: &str,
        status: StatusCode,
        latency: Duration,
    ) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((method.to_string(), route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        self.latency
            .lock()
            .await
            .entry(route.to_string())
            .or_default()
            .observe(latency);
    }

    /// Prometheus text exposition of everything observed so far.
    pub(crate) async fn render(&self, store_backend: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# TYPE {METRIC_PREFIX}_store_backend_info gauge\n{METRIC_PREFIX}_store_backend_info{{backend=\"{store_backend}\"}} 1"
        );

        let _ = writeln!(out, "# TYPE {METRIC_PREFIX}_http_requests_total counter");
        for ((method, route, status), n) in self.counts.lock().await.iter() {
            let _ = writeln!(
                out,
                "{METRIC_PREFIX}_http_requests_total{{method=\"{method}\",route=\"{route}\",status=\"{status}\"}} {n}"
            );
        }

        let _ = writeln!(
            out,
            "# TYPE {METRIC_PREFIX}_http_request_duration_seconds histogram"
        );
        for (route, hist) in self.latency.lock().await.iter() {
            for (bound, n) in LATENCY_BUCKETS_SECONDS.iter().zip(hist.buckets) {
                let _ = writeln!(
                    out,
                    "{METRIC_PREFIX}_http_request_duration_seconds_bucket{{route=\"{route}\",le=\"{bound}\"}} {n}"
                );
            }
            let _ = writeln!(
                out,
                "{METRIC_PREFIX}_http_request_duration_seconds_bucket{{route=\"{route}\",le=\"+Inf\"}} {}\n\
{METRIC_PREFIX}_http_request_duration_seconds_sum{{route=\"{route}\"}} {}\n\
{METRIC_PREFIX}_http_request_duration_seconds_count{{route=\"{route}\"}} {}",
                hist.count, hist.sum_seconds, hist.count
            );
        }
        out
    }
}
