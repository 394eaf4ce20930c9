use std::sync::Arc;

use dsync_repository::RepositoryManager;

use crate::{
    config::{self, Config},
    services::{self, Services},
};

pub(crate) struct CoreBootstrap {
    pub(crate) config: Arc<Config>,
    pub(crate) repository: Arc<RepositoryManager>,
    pub(crate) services: Services,
}

pub(crate) async fn build_core() -> CoreBootstrap {
    let config = Arc::new(config::initialize_configuration());
    crate::logger::initialize(&config.logger, &config.telemetry);

    let repository = Arc::new(
        RepositoryManager::connect(&config.repository)
            .await
            .expect("Failed to connect to repository database"),
    );

    let services = services::initialize(&config, &repository);

    CoreBootstrap {
        config,
        repository,
        services,
    }
}
