use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_remote_request(operation: &str, status: &str, attempts: u32, duration: Duration) {
    counter!(
        "dsync_remote_request_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dsync_remote_request_duration_seconds",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
    histogram!(
        "dsync_remote_request_attempts",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(f64::from(attempts));
}

pub fn record_token_refresh(status: &str) {
    counter!(
        "dsync_token_refresh_total",
        "status" => status.to_string()
    )
    .increment(1);
}
