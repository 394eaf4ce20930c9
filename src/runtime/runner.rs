use std::sync::Arc;

use tokio::{select, signal::unix::SignalKind};
use tokio_util::sync::CancellationToken;

use super::{RuntimeDeps, shutdown};
use crate::{
    controllers::HttpApiRouter,
    periodic_tasks::{self, DestinationSyncConfig},
};

pub(crate) async fn run(
    deps: RuntimeDeps,
    http_router: Option<HttpApiRouter>,
    destination_sync_config: DestinationSyncConfig,
) {
    // Create HTTP shutdown channel (oneshot for single signal)
    let (http_shutdown_tx, http_shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let periodic_shutdown = CancellationToken::new();
    let periodic_handle = tokio::task::spawn(periodic_tasks::run(
        Arc::clone(&deps.periodic_tasks_deps),
        destination_sync_config,
        periodic_shutdown.clone(),
    ));

    // Spawn HTTP API task if enabled
    let handle_http_events_task = tokio::task::spawn(async move {
        if let Some(router) = http_router {
            router
                .listen_and_handle_http_requests(http_shutdown_rx)
                .await;
        } else {
            // HTTP API disabled - wait for shutdown signal
            let _ = http_shutdown_rx.await;
        }
    });

    // Wait for shutdown signal (SIGINT or SIGTERM)
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())
        .expect("Failed to install SIGTERM handler");

    select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, initiating shutdown..."),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating shutdown..."),
    }

    shutdown::graceful_shutdown(shutdown::ShutdownContext {
        periodic_shutdown,
        periodic_handle,
        http_shutdown_tx,
        handle_http_events_task,
    })
    .await;
}
