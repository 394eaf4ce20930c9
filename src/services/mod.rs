pub(crate) mod credential_resolver;
pub(crate) mod destination_sync;

use std::sync::Arc;

pub(crate) use credential_resolver::TenantCredentialResolver;
pub(crate) use destination_sync::{
    DestinationSync, DestinationSyncService, ServiceError, SyncOutcome,
};
use dsync_destination_client::ClientFactory;
use dsync_repository::RepositoryManager;

use crate::config::Config;

pub(crate) struct Services {
    pub(crate) destination_sync: Arc<DestinationSyncService>,
}

pub(crate) fn initialize(config: &Config, repository: &RepositoryManager) -> Services {
    let settings = &config.destination_client;
    let clients = Arc::new(ClientFactory::new(
        settings.client.clone(),
        settings.regions.clone(),
    ));
    let resolver = TenantCredentialResolver::new(
        repository.tenant_label_repository(),
        settings.subdomain_label_key.clone(),
        settings.region_label_key.clone(),
    );

    Services {
        destination_sync: Arc::new(DestinationSyncService::new(
            resolver,
            clients,
            repository.destination_repository(),
            config.sync.bulk_fetch_parallelism,
        )),
    }
}
