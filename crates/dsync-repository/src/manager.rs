use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub use crate::config::RepositoryManagerConfig;
use crate::{
    error::RepositoryError,
    migrations::Migrator,
    repositories::{
        bundle_repository::BundleRepository, destination_repository::DestinationRepository,
        leader_lease_repository::LeaderLeaseRepository,
        tenant_label_repository::TenantLabelRepository,
    },
};

pub struct RepositoryManager {
    destination_repository: DestinationRepository,
    tenant_label_repository: TenantLabelRepository,
    bundle_repository: BundleRepository,
    leader_lease_repository: LeaderLeaseRepository,
}

impl RepositoryManager {
    /// Connects to the configured database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the connection or a migration fails.
    pub async fn connect(config: &RepositoryManagerConfig) -> Result<Self, RepositoryError> {
        let mut opt = ConnectOptions::new(config.connection_string());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(true)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        let conn = Database::connect(opt).await?;
        tracing::info!(
            host = %config.host,
            database = %config.database,
            "Connected to repository database"
        );

        Self::from_connection(conn).await
    }

    /// Wraps an already open connection, applying pending migrations.
    pub async fn from_connection(conn: DatabaseConnection) -> Result<Self, RepositoryError> {
        let conn = Arc::new(conn);
        Migrator::up(conn.as_ref(), None).await?;

        Ok(RepositoryManager {
            destination_repository: DestinationRepository::new(Arc::clone(&conn)),
            tenant_label_repository: TenantLabelRepository::new(Arc::clone(&conn)),
            bundle_repository: BundleRepository::new(Arc::clone(&conn)),
            leader_lease_repository: LeaderLeaseRepository::new(Arc::clone(&conn)),
        })
    }

    pub fn destination_repository(&self) -> DestinationRepository {
        self.destination_repository.clone()
    }

    pub fn tenant_label_repository(&self) -> TenantLabelRepository {
        self.tenant_label_repository.clone()
    }

    pub fn bundle_repository(&self) -> BundleRepository {
        self.bundle_repository.clone()
    }

    pub fn leader_lease_repository(&self) -> LeaderLeaseRepository {
        self.leader_lease_repository.clone()
    }
}
