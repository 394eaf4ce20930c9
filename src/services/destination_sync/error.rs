use axum::http::StatusCode;
use dsync_destination_client::DestinationClientError;
use dsync_repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ServiceError {
    /// Tenant has no subscription (subdomain or region label missing)
    #[error("Tenant '{0}' has no destination subscription")]
    TenantNotFound(String),

    #[error("Destination '{0}' not found")]
    NotFound(String),

    /// Registry paged past its own reported count without the last page matching it
    #[error("Page {page} passed reported page count '{page_count}'")]
    PageCountMismatch { page: u32, page_count: String },

    #[error("Destination registry error: {0}")]
    Client(DestinationClientError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    Join(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<DestinationClientError> for ServiceError {
    fn from(error: DestinationClientError) -> Self {
        match error {
            DestinationClientError::NotFound(name) => Self::NotFound(name),
            other => Self::Client(other),
        }
    }
}

impl ServiceError {
    /// Status the HTTP boundary answers with for this error.
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            Self::TenantNotFound(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Client(_)
            | Self::PageCountMismatch { .. }
            | Self::Repository(_)
            | Self::Encode(_)
            | Self::Join(_)
            | Self::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
