use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_sync_pass(status: &str, duration: Duration, pages: u32, rows: u64) {
    counter!(
        "dsync_sync_pass_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dsync_sync_pass_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
    histogram!(
        "dsync_sync_pass_pages",
        "status" => status.to_string()
    )
    .record(f64::from(pages));
    histogram!(
        "dsync_sync_pass_rows",
        "status" => status.to_string()
    )
    .record(rows as f64);
}

pub fn record_sync_skipped_destination(reason: &str) {
    counter!(
        "dsync_sync_skipped_destinations_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

pub fn record_stale_rows_deleted(status: &str, rows: u64) {
    counter!(
        "dsync_stale_rows_deleted_total",
        "status" => status.to_string()
    )
    .increment(rows);
}

pub fn record_bulk_fetch(status: &str, requested: usize, duration: Duration) {
    counter!(
        "dsync_bulk_fetch_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dsync_bulk_fetch_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
    histogram!(
        "dsync_bulk_fetch_requested",
        "status" => status.to_string()
    )
    .record(requested as f64);
}
