mod defaults;
mod destination_client;
mod error;
mod loader;
mod raw;

pub(crate) use destination_client::{DestinationClientSettings, DestinationClientSettingsRaw};
pub(crate) use error::ConfigError;
pub(crate) use loader::initialize_configuration;
pub(crate) use raw::{Config, ConfigRaw};
