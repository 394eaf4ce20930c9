mod config;
mod config_error;
pub mod error;
mod manager;
mod migrations;
mod models;
mod observability;
mod repositories;
mod types;

pub use config::{RepositoryManagerConfig, RepositoryManagerConfigRaw};
pub use config_error::ConfigError;
pub use manager::RepositoryManager;
pub use repositories::{
    bundle_repository::BundleRepository,
    destination_repository::{DestinationBatch, DestinationRepository},
    leader_lease_repository::LeaderLeaseRepository,
    tenant_label_repository::TenantLabelRepository,
};
pub use types::{ApplicationEntry, BundleEntry, BundleMatchCriteria, DestinationRow};

#[cfg(test)]
mod tests;
