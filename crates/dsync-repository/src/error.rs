use thiserror::Error;

/// Error types for repository/database operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database error - wraps all SeaORM errors
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// Stored bundle correlation ids are not a JSON string array.
    #[error("Invalid correlation ids for bundle {bundle_id}: {reason}")]
    CorrelationIds { bundle_id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
