use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct DestinationSyncConfig {
    pub enabled: bool,
    pub period_secs: u64,
    /// Hard deadline for one tenant's sync pass.
    pub tenant_timeout_secs: u64,
    pub parallel_tenants: usize,
    /// Disable for single-replica deployments.
    pub election_enabled: bool,
    pub lease_duration_secs: u64,
    /// Concurrent registry requests per bulk sensitive-data fetch.
    pub bulk_fetch_parallelism: usize,
}

impl DestinationSyncConfig {
    pub(crate) fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    pub(crate) fn tenant_timeout(&self) -> Duration {
        Duration::from_secs(self.tenant_timeout_secs)
    }

    pub(crate) fn lease_duration(&self) -> Duration {
        Duration::from_secs(self.lease_duration_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.period_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "sync.period_secs must be greater than 0".to_string(),
            ));
        }
        if self.tenant_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "sync.tenant_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.parallel_tenants == 0 {
            return Err(ConfigError::InvalidConfig(
                "sync.parallel_tenants must be at least 1".to_string(),
            ));
        }
        if self.bulk_fetch_parallelism == 0 {
            return Err(ConfigError::InvalidConfig(
                "sync.bulk_fetch_parallelism must be at least 1".to_string(),
            ));
        }
        // the leader renews once per tick; a shorter lease lets another replica take over mid-cycle
        if self.election_enabled && self.lease_duration_secs <= self.period_secs {
            return Err(ConfigError::InvalidConfig(format!(
                "sync.lease_duration_secs ({}) must exceed sync.period_secs ({})",
                self.lease_duration_secs, self.period_secs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use figment::{
        Figment,
        providers::{Format, Toml},
    };

    use super::*;

    fn config() -> DestinationSyncConfig {
        DestinationSyncConfig {
            enabled: true,
            period_secs: 600,
            tenant_timeout_secs: 300,
            parallel_tenants: 4,
            election_enabled: true,
            lease_duration_secs: 1_800,
            bulk_fetch_parallelism: 8,
        }
    }

    #[test]
    fn accepts_defaults() {
        assert!(config().validate().is_ok());
        assert_eq!(config().period(), Duration::from_secs(600));
        assert_eq!(config().tenant_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn rejects_zero_parallelism() {
        let config = DestinationSyncConfig {
            parallel_tenants: 0,
            ..config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn lease_must_outlive_period_only_with_election() {
        let short_lease = DestinationSyncConfig {
            lease_duration_secs: 600,
            ..config()
        };
        assert!(short_lease.validate().is_err());

        let single_replica = DestinationSyncConfig {
            election_enabled: false,
            ..short_lease
        };
        assert!(single_replica.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_fields() {
        let toml = r#"
            enabled = true
            period_secs = 600
            tenant_timeout_secs = 300
            parallel_tenants = 4
            election_enabled = false
            lease_duration_secs = 1800
            bulk_fetch_parallelism = 8
            retries = 3
        "#;
        let result: Result<DestinationSyncConfig, _> = Figment::new()
            .merge(Toml::string(toml))
            .extract();
        assert!(result.is_err());
    }
}
