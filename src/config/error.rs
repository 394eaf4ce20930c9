use thiserror::Error;

/// Failures while assembling the engine's startup configuration.
#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    /// figment could not merge or extract the layered sources.
    #[error("Failed to read sync engine configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file '{0}' does not exist")]
    ConfigFileNotFound(String),

    #[error("Config file does not name an environment: {0}")]
    MissingEnvironment(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// Region client secret absent from both config and environment.
    #[error("Destination client secret missing: {0}")]
    MissingSecret(String),

    #[error("Invalid sync engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Repository settings: {0}")]
    Repository(#[from] dsync_repository::ConfigError),
}
