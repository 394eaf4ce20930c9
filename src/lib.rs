mod bootstrap;
mod config;
mod controllers;
mod leader_election;
mod logger;
mod periodic_tasks;
mod runtime;
mod services;

pub async fn run() {
    // Install rustls crypto provider before any TLS connections
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let bootstrap::CoreBootstrap {
        config,
        repository,
        services,
    } = bootstrap::build_core().await;

    display_banner(&config.environment);

    let periodic_tasks_deps = bootstrap::build_periodic_tasks_deps(&config, &repository, &services);
    let controllers = bootstrap::build_controllers(&config, &services);

    runtime::run(
        runtime::RuntimeDeps {
            periodic_tasks_deps,
        },
        controllers.http_router,
        config.sync.clone(),
    )
    .await;
}

fn display_banner(environment: &str) {
    tracing::info!("======================================================");
    tracing::info!(
        "          Destination Sync Engine v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("======================================================");
    tracing::info!("Service is running in {} environment", environment);
}
