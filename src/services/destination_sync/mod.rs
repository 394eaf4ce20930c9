mod bulk;
mod error;
mod service;

use async_trait::async_trait;
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;

pub(crate) use error::ServiceError;
pub(crate) use service::DestinationSyncService;

/// Result of a sync pass that fetched and stored every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    FullySynced {
        revision: String,
        rows: u64,
    },
    /// Rows of older revisions could not be deleted; the next pass retries.
    CleanupPending {
        revision: String,
        rows: u64,
        error: String,
    },
}

impl SyncOutcome {
    pub(crate) fn revision(&self) -> &str {
        match self {
            Self::FullySynced { revision, .. } | Self::CleanupPending { revision, .. } => revision,
        }
    }

    pub(crate) fn rows(&self) -> u64 {
        match self {
            Self::FullySynced { rows, .. } | Self::CleanupPending { rows, .. } => *rows,
        }
    }
}

/// Tenant destination synchronization as used by the scheduler and HTTP API.
#[async_trait]
pub(crate) trait DestinationSync: Send + Sync {
    async fn subscribed_tenants(&self) -> Result<Vec<String>, ServiceError>;

    async fn sync_tenant(&self, tenant_id: &str) -> Result<SyncOutcome, ServiceError>;

    /// Fetch authentication payloads for `names`, failing on the first error.
    ///
    /// Returns `{"destinations": {name: <raw registry response>}}`.
    async fn fetch_sensitive_bulk(
        &self,
        tenant_id: &str,
        names: &[String],
        cancel: CancellationToken,
    ) -> Result<Box<RawValue>, ServiceError>;
}
