use std::{future::Future, time::Duration};

use dsync_observability::record_task_run;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Drive a periodic job until `shutdown` fires.
///
/// `tick` returns how long to wait before the next run. A running tick is not
/// interrupted; cancellation is only observed while sleeping.
pub(crate) async fn run_with_shutdown<F, Fut>(
    job: &'static str,
    shutdown: CancellationToken,
    mut tick: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Duration>,
{
    tracing::info!(job, "Periodic job started");

    loop {
        let started = Instant::now();
        let next_in = tick().await;
        record_task_run(job, "completed", started.elapsed());
        tracing::debug!(
            job,
            next_in_secs = next_in.as_secs(),
            "Periodic job tick finished"
        );

        tokio::select! {
            _ = tokio::time::sleep(next_in) => {}
            _ = shutdown.cancelled() => break,
        }
    }

    tracing::info!(job, "Periodic job stopped");
}
