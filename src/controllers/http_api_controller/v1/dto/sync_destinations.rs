use serde::Serialize;

use crate::services::SyncOutcome;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SyncDestinationsResponse {
    pub status: &'static str,
    pub revision: String,
    pub rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
}

impl From<SyncOutcome> for SyncDestinationsResponse {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::FullySynced { revision, rows } => Self {
                status: "SYNCED",
                revision,
                rows,
                cleanup_error: None,
            },
            SyncOutcome::CleanupPending {
                revision,
                rows,
                error,
            } => Self {
                status: "CLEANUP_PENDING",
                revision,
                rows,
                cleanup_error: Some(error),
            },
        }
    }
}
