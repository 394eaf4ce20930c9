use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use dsync_destination_client::{ClientProvider, DestinationApi};
use dsync_domain::{DestinationRecord, NormalizedDestination, Revision, normalize};
use dsync_observability::{
    record_stale_rows_deleted, record_sync_pass, record_sync_skipped_destination,
};
use dsync_repository::{BundleMatchCriteria, DestinationRepository, DestinationRow};
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;

use super::{DestinationSync, ServiceError, SyncOutcome, bulk};
use crate::services::TenantCredentialResolver;

pub(crate) struct DestinationSyncService {
    resolver: TenantCredentialResolver,
    clients: Arc<dyn ClientProvider>,
    destinations: DestinationRepository,
    bulk_fetch_parallelism: usize,
}

impl DestinationSyncService {
    pub(crate) fn new(
        resolver: TenantCredentialResolver,
        clients: Arc<dyn ClientProvider>,
        destinations: DestinationRepository,
        bulk_fetch_parallelism: usize,
    ) -> Self {
        Self {
            resolver,
            clients,
            destinations,
            bulk_fetch_parallelism: bulk_fetch_parallelism.max(1),
        }
    }

    async fn client_for_tenant(
        &self,
        tenant_id: &str,
    ) -> Result<Arc<dyn DestinationApi>, ServiceError> {
        let credentials = self.resolver.resolve(tenant_id).await?;
        Ok(self
            .clients
            .client_for(&credentials.region, &credentials.subdomain)?)
    }

    /// Fetch every page, then sweep rows left over from earlier revisions.
    ///
    /// Any page or storage failure aborts the pass before the sweep, leaving
    /// previously stored rows untouched.
    async fn run_pass(
        &self,
        tenant_id: &str,
        pages: &mut u32,
        rows: &mut u64,
    ) -> Result<SyncOutcome, ServiceError> {
        let client = self.client_for_tenant(tenant_id).await?;
        let revision = Revision::generate();

        let mut page: u32 = 1;
        loop {
            let fetched = client.fetch_page(page).await?;
            *pages += 1;

            let received = fetched.destinations.len();
            *rows += self
                .store_page(tenant_id, &revision, fetched.destinations)
                .await?;

            // Registry contract: the last page is the one whose index equals
            // the reported page count, compared as text.
            if page.to_string() == fetched.page_count {
                break;
            }
            // A count the index can no longer reach textually would page forever.
            if !count_reachable_after(page, &fetched.page_count) {
                return Err(ServiceError::PageCountMismatch {
                    page,
                    page_count: fetched.page_count,
                });
            }
            tracing::trace!(tenant_id, page, received, "Stored destination page");
            page += 1;
        }

        match self
            .destinations
            .delete_stale(tenant_id, revision.as_str())
            .await
        {
            Ok(deleted) => {
                record_stale_rows_deleted("ok", deleted);
                tracing::debug!(tenant_id, %revision, deleted, "Deleted stale destinations");
                Ok(SyncOutcome::FullySynced {
                    revision: revision.to_string(),
                    rows: *rows,
                })
            }
            Err(error) => {
                record_stale_rows_deleted("error", 0);
                tracing::error!(
                    tenant_id,
                    %revision,
                    error = %error,
                    "Failed to delete stale destinations; cleanup pending"
                );
                Ok(SyncOutcome::CleanupPending {
                    revision: revision.to_string(),
                    rows: *rows,
                    error: error.to_string(),
                })
            }
        }
    }

    /// Normalize, correlate and upsert one page in a single transaction.
    async fn store_page(
        &self,
        tenant_id: &str,
        revision: &Revision,
        records: Vec<DestinationRecord>,
    ) -> Result<u64, ServiceError> {
        let mut batch = self.destinations.begin().await?;

        for record in records {
            let name = record.name.clone();
            let destination = match normalize(record) {
                Ok(destination) => destination,
                Err(error) => {
                    record_sync_skipped_destination("invalid");
                    tracing::warn!(
                        tenant_id,
                        destination = %name,
                        error = %error,
                        "Skipping destination that failed validation"
                    );
                    continue;
                }
            };

            let bundle_ids = batch
                .matching_bundle_ids(tenant_id, match_criteria(&destination))
                .await?;
            if bundle_ids.is_empty() {
                record_sync_skipped_destination("no_bundle");
                tracing::debug!(
                    tenant_id,
                    destination = %destination.name,
                    correlation_id = %destination.x_correlation_id,
                    "No bundle matches destination; skipping"
                );
                continue;
            }

            for bundle_id in bundle_ids {
                batch
                    .upsert(to_row(tenant_id, bundle_id, revision, &destination))
                    .await?;
            }
        }

        Ok(batch.commit().await?)
    }
}

#[async_trait]
impl DestinationSync for DestinationSyncService {
    async fn subscribed_tenants(&self) -> Result<Vec<String>, ServiceError> {
        self.resolver.subscribed_tenants().await
    }

    #[tracing::instrument(name = "destination_sync.sync_tenant", skip(self))]
    async fn sync_tenant(&self, tenant_id: &str) -> Result<SyncOutcome, ServiceError> {
        let started = Instant::now();
        let mut pages = 0;
        let mut rows = 0;

        let result = self.run_pass(tenant_id, &mut pages, &mut rows).await;

        let status = match &result {
            Ok(SyncOutcome::FullySynced { .. }) => "ok",
            Ok(SyncOutcome::CleanupPending { .. }) => "cleanup_pending",
            Err(_) => "error",
        };
        record_sync_pass(status, started.elapsed(), pages, rows);

        match &result {
            Ok(outcome) => tracing::info!(
                revision = %outcome.revision(),
                pages,
                rows = outcome.rows(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Tenant destinations synchronized"
            ),
            Err(error) => tracing::warn!(pages, error = %error, "Tenant destination sync failed"),
        }

        result
    }

    #[tracing::instrument(
        name = "destination_sync.fetch_sensitive_bulk",
        skip(self, names, cancel),
        fields(requested = names.len())
    )]
    async fn fetch_sensitive_bulk(
        &self,
        tenant_id: &str,
        names: &[String],
        cancel: CancellationToken,
    ) -> Result<Box<RawValue>, ServiceError> {
        let client = self.client_for_tenant(tenant_id).await?;
        bulk::fetch_all(client, names, self.bulk_fetch_parallelism, cancel).await
    }
}

/// Whether a later page index can still equal `page_count` as text.
fn count_reachable_after(page: u32, page_count: &str) -> bool {
    match page_count.parse::<u32>() {
        Ok(count) => count > page && count.to_string() == page_count,
        Err(_) => false,
    }
}

fn match_criteria(destination: &NormalizedDestination) -> BundleMatchCriteria<'_> {
    BundleMatchCriteria {
        x_correlation_id: &destination.x_correlation_id,
        x_system_tenant_id: &destination.x_system_tenant_id,
        x_system_tenant_name: &destination.x_system_tenant_name,
        x_system_base_url: &destination.x_system_base_url,
    }
}

fn to_row(
    tenant_id: &str,
    bundle_id: String,
    revision: &Revision,
    destination: &NormalizedDestination,
) -> DestinationRow {
    DestinationRow {
        tenant_id: tenant_id.to_string(),
        name: destination.name.clone(),
        bundle_id,
        revision: revision.to_string(),
        destination_type: destination.destination_type.clone(),
        url: destination.url.clone(),
        authentication: destination.authentication.clone(),
        x_correlation_id: destination.x_correlation_id.clone(),
        x_system_tenant_id: destination.x_system_tenant_id.clone(),
        x_system_tenant_name: destination.x_system_tenant_name.clone(),
        x_system_type: destination.x_system_type.clone(),
        x_system_base_url: destination.x_system_base_url.clone(),
    }
}
