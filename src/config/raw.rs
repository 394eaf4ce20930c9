use dsync_repository::{RepositoryManagerConfig, RepositoryManagerConfigRaw};
use serde::{Deserialize, Serialize};

use super::{ConfigError, DestinationClientSettings, DestinationClientSettingsRaw};
use crate::{
    controllers::http_api_controller::router::HttpApiConfig,
    logger::{LoggerConfig, TelemetryConfig},
    periodic_tasks::DestinationSyncConfig,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub repository: RepositoryManagerConfigRaw,
    pub destination_client: DestinationClientSettingsRaw,
    pub sync: DestinationSyncConfig,
    pub http_api: HttpApiConfig,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub environment: String,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub repository: RepositoryManagerConfig,
    pub destination_client: DestinationClientSettings,
    pub sync: DestinationSyncConfig,
    pub http_api: HttpApiConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        self.sync.validate()?;
        self.http_api.tenant_header_name()?;

        Ok(Config {
            environment: self.environment,
            logger: self.logger,
            telemetry: self.telemetry,
            repository: self.repository.resolve()?,
            destination_client: self.destination_client.resolve()?,
            sync: self.sync,
            http_api: self.http_api,
        })
    }
}
