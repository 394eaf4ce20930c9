use std::{sync::Arc, time::Duration};

use dsync_observability::record_scheduler_tick;
use tokio::{sync::Semaphore, task::JoinSet, time::Instant};
use tokio_util::sync::CancellationToken;

use super::DestinationSyncConfig;
use crate::{
    leader_election::LeaderElector,
    periodic_tasks::{DestinationSyncDeps, runner::run_with_shutdown},
    services::{DestinationSync, ServiceError, SyncOutcome},
};

/// Lease name for the recurring sync job.
pub(crate) const DESTINATION_SYNC_JOB: &str = "destination_sync";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TickSummary {
    pub(crate) tenants: usize,
    pub(crate) synced: usize,
    pub(crate) cleanup_pending: usize,
    pub(crate) failed: usize,
    pub(crate) timed_out: usize,
}

enum WorkerResult {
    Finished(Result<SyncOutcome, ServiceError>),
    TimedOut,
}

pub(crate) struct DestinationSyncTask {
    destination_sync: Arc<dyn DestinationSync>,
    leader_elector: Arc<dyn LeaderElector>,
    config: DestinationSyncConfig,
}

impl DestinationSyncTask {
    pub(crate) fn new(deps: DestinationSyncDeps, config: DestinationSyncConfig) -> Self {
        Self {
            destination_sync: deps.destination_sync,
            leader_elector: deps.leader_elector,
            config,
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown(DESTINATION_SYNC_JOB, shutdown, || self.execute()).await;
        self.leader_elector.step_down(DESTINATION_SYNC_JOB).await;
    }

    #[tracing::instrument(name = "periodic_tasks.destination_sync", skip(self))]
    pub(crate) async fn execute(&self) -> Duration {
        let period = self.config.period();

        if !self.config.enabled {
            tracing::debug!("Destination sync disabled by configuration");
            return period;
        }

        if !self.leader_elector.try_lead(DESTINATION_SYNC_JOB).await {
            tracing::debug!("Not the leader; skipping destination sync tick");
            record_scheduler_tick(false, 0, 0, 0, 0);
            return period;
        }

        let started = Instant::now();
        match self.tick().await {
            Ok(summary) if summary.tenants == 0 => {}
            Ok(summary) => tracing::info!(
                tenants = summary.tenants,
                synced = summary.synced,
                cleanup_pending = summary.cleanup_pending,
                failed = summary.failed,
                timed_out = summary.timed_out,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Destination sync tick completed"
            ),
            Err(error) => {
                record_scheduler_tick(true, 0, 0, 0, 0);
                tracing::error!(error = %error, "Failed to list subscribed tenants");
            }
        }

        period
    }

    /// Sync every subscribed tenant and wait for all workers.
    ///
    /// A failing or timed-out tenant never cancels its siblings.
    pub(crate) async fn tick(&self) -> Result<TickSummary, ServiceError> {
        let tenants = self.destination_sync.subscribed_tenants().await?;
        if tenants.is_empty() {
            tracing::debug!("No subscribed tenants; skipping tick");
            record_scheduler_tick(true, 0, 0, 0, 0);
            return Ok(TickSummary::default());
        }

        let mut summary = TickSummary {
            tenants: tenants.len(),
            ..TickSummary::default()
        };
        let permits = Arc::new(Semaphore::new(self.config.parallel_tenants.max(1)));
        let tenant_timeout = self.config.tenant_timeout();
        let mut workers = JoinSet::new();

        for tenant_id in tenants {
            let permits = Arc::clone(&permits);
            let destination_sync = Arc::clone(&self.destination_sync);
            workers.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let result = match tokio::time::timeout(
                    tenant_timeout,
                    destination_sync.sync_tenant(&tenant_id),
                )
                .await
                {
                    Ok(result) => WorkerResult::Finished(result),
                    Err(_) => WorkerResult::TimedOut,
                };
                (tenant_id, result)
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((_, WorkerResult::Finished(Ok(SyncOutcome::FullySynced { .. })))) => {
                    summary.synced += 1;
                }
                Ok((
                    tenant_id,
                    WorkerResult::Finished(Ok(SyncOutcome::CleanupPending { error, .. })),
                )) => {
                    summary.cleanup_pending += 1;
                    tracing::warn!(
                        tenant_id = %tenant_id,
                        error = %error,
                        "Tenant synced but stale rows remain"
                    );
                }
                Ok((tenant_id, WorkerResult::Finished(Err(error)))) => {
                    summary.failed += 1;
                    tracing::error!(
                        tenant_id = %tenant_id,
                        error = %error,
                        "Tenant destination sync failed"
                    );
                }
                Ok((tenant_id, WorkerResult::TimedOut)) => {
                    summary.timed_out += 1;
                    tracing::error!(
                        tenant_id = %tenant_id,
                        timeout_secs = tenant_timeout.as_secs(),
                        "Tenant destination sync timed out"
                    );
                }
                Err(error) => {
                    summary.failed += 1;
                    tracing::error!(error = ?error, "Tenant sync worker panicked");
                }
            }
        }

        record_scheduler_tick(
            true,
            summary.tenants,
            summary.synced,
            summary.cleanup_pending,
            summary.failed + summary.timed_out,
        );
        Ok(summary)
    }
}
