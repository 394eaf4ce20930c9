use thiserror::Error;

/// Rejected database settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `repository.password` nor `DB_PASSWORD` is set.
    #[error("Database password missing: {0}")]
    MissingPassword(String),

    #[error("Invalid connection pool settings: {0}")]
    InvalidPool(String),
}
