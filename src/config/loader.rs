use std::path::Path;

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::Deserialize;

use super::{Config, ConfigRaw, defaults};
use crate::config::ConfigError;

const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

#[derive(Debug, Deserialize)]
struct EnvironmentConfig {
    environment: Option<String>,
}

pub(crate) fn initialize_configuration() -> Config {
    load_configuration().expect("Failed to load configuration")
}

fn load_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("Destination Sync Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .get_matches();

    load_from(matches.get_one::<String>("config").map(String::as_str))
}

/// Layered load: typed environment defaults, then `config.toml`, then the
/// custom file (highest priority).
fn load_from(custom_config_path: Option<&str>) -> Result<Config, ConfigError> {
    let environment = resolve_environment(custom_config_path)?;

    tracing::info!("Loading configuration for environment: {}", environment);

    let mut figment = Figment::from(Serialized::defaults(defaults::config_for(&environment)?));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if let Some(config_path) = custom_config_path {
        tracing::info!("Loading custom config file: {}", config_path);
        figment = figment.merge(Toml::file(config_path));
    }

    let mut config: ConfigRaw = figment.extract().map_err(Box::new)?;
    config.environment = normalize_env(config.environment);
    if config.environment != environment {
        return Err(ConfigError::UnknownEnvironment(format!(
            "config environment '{}' does not match selected '{}'",
            config.environment, environment
        )));
    }

    config.resolve()
}

fn resolve_environment(custom_config_path: Option<&str>) -> Result<String, ConfigError> {
    let config_path = custom_config_path.unwrap_or("config.toml");

    if !Path::new(config_path).exists() {
        return Err(ConfigError::ConfigFileNotFound(config_path.to_string()));
    }

    let environment = Figment::from(Toml::file(config_path))
        .extract::<EnvironmentConfig>()
        .map_err(Box::new)?
        .environment
        .map(normalize_env)
        .ok_or_else(|| {
            ConfigError::MissingEnvironment(format!(
                "set environment = \"{}\" in your config",
                ENVIRONMENTS.join("|")
            ))
        })?;

    if !ENVIRONMENTS.contains(&environment.as_str()) {
        return Err(ConfigError::UnknownEnvironment(environment));
    }

    Ok(environment)
}

fn normalize_env(env: String) -> String {
    env.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn custom_file_overrides_environment_defaults() {
        let file = config_file(
            r#"
environment = "Staging"

[repository]
password = "from-file"

[sync]
parallel_tenants = 7

[destination_client.regions.eu10]
client_id = "client"
client_secret = "secret"
token_url = "https://tenant.auth.eu10.example.com/oauth/token"
base_url = "https://destination.eu10.example.com"
"#,
        );

        let config = load_from(file.path().to_str()).unwrap();

        assert_eq!(config.environment, "staging");
        assert_eq!(config.repository.password, "from-file");
        assert_eq!(config.sync.parallel_tenants, 7);
        assert!(config.destination_client.regions.contains_key("eu10"));
        assert!(config.destination_client.regions["eu10"].mtls.is_none());
    }

    #[test]
    fn missing_environment_is_reported() {
        let file = config_file("[sync]\nenabled = false\n");
        assert!(matches!(
            load_from(file.path().to_str()),
            Err(ConfigError::MissingEnvironment(_))
        ));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let file = config_file("environment = \"mainnet\"\n");
        assert!(matches!(
            load_from(file.path().to_str()),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = config_file("environment = \"development\"\n[sync]\nbogus = 1\n");
        assert!(matches!(
            load_from(file.path().to_str()),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            load_from(Some("/nonexistent/dsync.toml")),
            Err(ConfigError::ConfigFileNotFound(_))
        ));
    }
}
