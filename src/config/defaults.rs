//! Typed default configurations for each environment.
//!
//! Every environment gets a fully constructed [`ConfigRaw`] via [`config_for`];
//! files only need to override what differs. Region instances and secrets have
//! no defaults and must come from the config file or the environment.

use std::collections::BTreeMap;

use dsync_repository::RepositoryManagerConfigRaw;

use super::{ConfigError, ConfigRaw, DestinationClientSettingsRaw};
use crate::{
    controllers::http_api_controller::router::HttpApiConfig,
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    periodic_tasks::DestinationSyncConfig,
};

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "staging" => Ok(staging()),
        "production" => Ok(production()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults ─────────────────────────────────────────────

fn destination_client() -> DestinationClientSettingsRaw {
    DestinationClientSettingsRaw {
        page_size: 100,
        retry_attempts: 3,
        retry_interval_ms: 1_000,
        request_timeout_ms: 30_000,
        subdomain_label_key: "subdomain".to_string(),
        region_label_key: "region".to_string(),
        regions: BTreeMap::new(),
    }
}

fn http_api() -> HttpApiConfig {
    HttpApiConfig {
        enabled: true,
        port: 8080,
        tenant_header: "x-tenant-id".to_string(),
    }
}

// ── Parameterized helpers ───────────────────────────────────────

fn sync(election_enabled: bool, parallel_tenants: usize) -> DestinationSyncConfig {
    DestinationSyncConfig {
        enabled: true,
        period_secs: 600,
        tenant_timeout_secs: 300,
        parallel_tenants,
        election_enabled,
        lease_duration_secs: 1_800,
        bulk_fetch_parallelism: 8,
    }
}

fn repository(host: &str, max_connections: u32) -> RepositoryManagerConfigRaw {
    RepositoryManagerConfigRaw {
        user: "dsync".to_string(),
        password: None,
        database: "destination_sync".to_string(),
        host: host.to_string(),
        port: 3306,
        max_connections,
        min_connections: 1,
    }
}

fn telemetry(metrics_enabled: bool) -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled: metrics_enabled,
            bind_address: "0.0.0.0:9464".to_string(),
        },
    }
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        logger: LoggerConfig {
            level: "destination_sync_engine=debug,dsync_destination_client=debug,info".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(false),
        repository: repository("localhost", 5),
        destination_client: destination_client(),
        sync: sync(false, 2),
        http_api: http_api(),
    }
}

fn staging() -> ConfigRaw {
    ConfigRaw {
        environment: "staging".to_string(),
        logger: LoggerConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        },
        telemetry: telemetry(true),
        repository: repository("mysql", 20),
        destination_client: destination_client(),
        sync: sync(true, 5),
        http_api: http_api(),
    }
}

fn production() -> ConfigRaw {
    ConfigRaw {
        environment: "production".to_string(),
        logger: LoggerConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        },
        telemetry: telemetry(true),
        repository: repository("mysql", 50),
        destination_client: destination_client(),
        sync: sync(true, 10),
        http_api: http_api(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_environment_has_valid_defaults() {
        for environment in ["development", "staging", "production"] {
            let mut raw = config_for(environment).unwrap();
            assert_eq!(raw.environment, environment);
            raw.repository.password = Some("pw".to_string());
            raw.resolve().unwrap();
        }
    }

    #[test]
    fn unknown_environment_has_no_defaults() {
        assert!(matches!(
            config_for("mainnet"),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }
}
