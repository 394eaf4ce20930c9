pub(crate) mod http_api_controller;

pub(crate) use http_api_controller::router::{HttpApiConfig, HttpApiRouter};

use self::http_api_controller::HttpApiDeps;

/// Container for all initialized controllers.
pub(crate) struct Controllers {
    pub http_router: Option<HttpApiRouter>,
}

/// Initialize all controllers.
pub(crate) fn initialize(http_api_config: &HttpApiConfig, http_api_deps: HttpApiDeps) -> Controllers {
    let http_router = if http_api_config.enabled {
        tracing::info!("HTTP API enabled on port {}", http_api_config.port);
        Some(HttpApiRouter::new(http_api_config, http_api_deps))
    } else {
        tracing::info!("HTTP API disabled");
        None
    };

    Controllers { http_router }
}
