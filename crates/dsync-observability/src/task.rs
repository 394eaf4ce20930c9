use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_task_run(task: &str, status: &str, duration: Duration) {
    counter!(
        "dsync_task_runs_total",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dsync_task_duration_seconds",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_scheduler_tick(
    leader: bool,
    tenants: usize,
    succeeded: usize,
    cleanup_pending: usize,
    failed: usize,
) {
    counter!(
        "dsync_scheduler_ticks_total",
        "leader" => leader.to_string()
    )
    .increment(1);
    histogram!("dsync_scheduler_tick_tenants").record(tenants as f64);
    counter!("dsync_scheduler_tenant_syncs_total", "outcome" => "synced")
        .increment(succeeded as u64);
    counter!("dsync_scheduler_tenant_syncs_total", "outcome" => "cleanup_pending")
        .increment(cleanup_pending as u64);
    counter!("dsync_scheduler_tenant_syncs_total", "outcome" => "failed").increment(failed as u64);
}
