mod deps;
mod runner;
pub(crate) mod tasks;

use std::sync::Arc;

pub(crate) use deps::{DestinationSyncDeps, PeriodicTasksDeps};
pub(crate) use tasks::destination_sync::DestinationSyncConfig;
use tasks::destination_sync::DestinationSyncTask;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Spawn all periodic tasks and wait for them to complete.
///
/// Under normal operation, tasks only exit during shutdown. Panics are
/// logged as they happen.
pub(crate) async fn run(
    deps: Arc<PeriodicTasksDeps>,
    destination_sync_config: DestinationSyncConfig,
    shutdown: CancellationToken,
) {
    let mut set = JoinSet::new();

    let destination_sync_deps = deps.destination_sync.clone();
    let destination_sync_shutdown = shutdown.clone();
    set.spawn(async move {
        DestinationSyncTask::new(destination_sync_deps, destination_sync_config)
            .run(destination_sync_shutdown)
            .await;
    });

    while let Some(result) = set.join_next().await {
        match result {
            Ok(()) => {}
            Err(e) if e.is_panic() => {
                tracing::error!("Periodic task panicked: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Periodic task failed: {:?}", e);
            }
        }
    }
}
