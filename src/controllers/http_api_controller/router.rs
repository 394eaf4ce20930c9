use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    Router,
    http::HeaderName,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::{
    HttpApiDeps,
    v1::{
        destinations::DestinationsHttpApiController, info::InfoHttpApiController,
        sync_destinations::SyncDestinationsHttpApiController,
    },
};
use crate::config::ConfigError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HttpApiConfig {
    /// Whether the HTTP API server is enabled.
    pub enabled: bool,
    pub port: u16,
    /// Request header carrying the caller's tenant id.
    pub tenant_header: String,
}

impl HttpApiConfig {
    pub(crate) fn tenant_header_name(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::from_bytes(self.tenant_header.as_bytes()).map_err(|e| {
            ConfigError::InvalidConfig(format!(
                "http_api.tenant_header '{}' is not a valid header name: {e}",
                self.tenant_header
            ))
        })
    }
}

pub(crate) struct HttpApiRouter {
    config: HttpApiConfig,
    router: Router,
}

/// Maximum request body size in bytes (1 MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

pub(crate) fn build_router(deps: HttpApiDeps) -> Router {
    Router::new()
        .route("/v1/info", get(InfoHttpApiController::handle_request))
        .route(
            "/v1/syncDestinations",
            put(SyncDestinationsHttpApiController::handle_request),
        )
        .route(
            "/v1/destinations",
            get(DestinationsHttpApiController::handle_request),
        )
        .with_state(deps)
        // Layer order (last added runs first): body limit, then request tracing
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
}

impl HttpApiRouter {
    pub(crate) fn new(config: &HttpApiConfig, deps: HttpApiDeps) -> Self {
        tracing::info!(
            tenant_header = %deps.tenant_header,
            max_body_kb = MAX_BODY_SIZE / 1024,
            "HTTP API router configured"
        );

        HttpApiRouter {
            config: config.to_owned(),
            router: build_router(deps),
        }
    }

    pub(crate) async fn listen_and_handle_http_requests(self, shutdown_rx: oneshot::Receiver<()>) {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port));

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(error) => {
                tracing::error!(%addr, error = %error, "Failed to bind HTTP listener");
                return;
            }
        };
        tracing::info!(%addr, "HTTP API listening");

        if let Err(error) = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
        {
            tracing::error!(error = %error, "HTTP server failed");
        }
    }
}
