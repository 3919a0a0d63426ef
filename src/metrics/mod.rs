// Prometheus metrics for the transformation service
//
// Registered once in the default registry, which Pingora's Prometheus
// service exposes on its own listener.

use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use std::time::Duration;

pub struct Metrics {
    /// Responses by status code
    pub requests: IntCounterVec,

    /// Wall time of the decode → encode chain, by output format
    pub transform_duration: HistogramVec,

    /// Bytes fetched from the object store
    pub source_bytes: IntCounter,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

impl Metrics {
    /// Global instance, registered on first use
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| Metrics {
            requests: register_int_counter_vec!(
                "kagami_requests_total",
                "Total number of image requests by response status",
                &["status"]
            )
            .expect("Failed to register kagami_requests_total metric"),
            transform_duration: register_histogram_vec!(
                "kagami_transform_duration_seconds",
                "Duration of image transformations in seconds",
                &["format"],
                vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            )
            .expect("Failed to register kagami_transform_duration_seconds metric"),
            source_bytes: register_int_counter!(
                "kagami_source_bytes_total",
                "Total bytes fetched from the object store"
            )
            .expect("Failed to register kagami_source_bytes_total metric"),
        })
    }

    pub fn record_request(&self, status: u16) {
        let status = status.to_string();
        self.requests.with_label_values(&[status.as_str()]).inc();
    }

    pub fn record_transform(&self, format: &str, elapsed: Duration) {
        self.transform_duration
            .with_label_values(&[format])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_source_bytes(&self, bytes: usize) {
        self.source_bytes.inc_by(bytes as u64);
    }
}
