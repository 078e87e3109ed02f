//! API request metrics.
//!
//! Provides functions for recording request duration and failures through the
//! `metrics` facade. Nothing is exported unless the host installs a recorder.

use metrics::{counter, histogram};
use std::time::Instant;

/// Record API request duration.
pub fn record_request_duration(resource: &'static str, operation: &'static str, duration_secs: f64) {
    histogram!(
        "catalog_api_request_duration_seconds",
        "resource" => resource,
        "operation" => operation
    )
    .record(duration_secs);
}

/// Count a failed API request.
pub fn record_request_failure(resource: &'static str, operation: &'static str) {
    counter!(
        "catalog_api_request_failures_total",
        "resource" => resource,
        "operation" => operation
    )
    .increment(1);
}

/// Times one API request.
///
/// Usage:
/// ```ignore
/// let timer = RequestTimer::new("products", "list");
/// let result = transport.send(request).await;
/// timer.finish(result.is_ok());
/// ```
pub struct RequestTimer {
    resource: &'static str,
    operation: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(resource: &'static str, operation: &'static str) -> Self {
        Self {
            resource,
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration, and a failure when `succeeded` is false.
    pub fn finish(self, succeeded: bool) {
        let duration = self.start.elapsed().as_secs_f64();
        record_request_duration(self.resource, self.operation, duration);
        if !succeeded {
            record_request_failure(self.resource, self.operation);
        }
    }
}
