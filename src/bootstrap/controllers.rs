use std::sync::Arc;

use crate::{
    config::Config,
    controllers::{self, http_api_controller::HttpApiDeps},
    services::{DestinationSync, Services},
};

pub(crate) fn build_controllers(config: &Config, services: &Services) -> controllers::Controllers {
    controllers::initialize(
        &config.http_api,
        HttpApiDeps {
            destination_sync: Arc::clone(&services.destination_sync) as Arc<dyn DestinationSync>,
            tenant_header: config
                .http_api
                .tenant_header_name()
                .expect("Tenant header is validated when configuration loads"),
        },
    )
}
