use std::{collections::HashMap, sync::Arc};

use dashmap::DashMap;
use url::Url;

use crate::{
    client::{DestinationApi, RemoteDestinationClient},
    config::{DestinationClientConfig, MtlsIdentity, RegionInstanceConfig},
    error::{DestinationClientError, Result},
};

/// Source of authenticated registry clients for a (region, subdomain) pair.
pub trait ClientProvider: Send + Sync {
    fn client_for(&self, region: &str, subdomain: &str) -> Result<Arc<dyn DestinationApi>>;
}

/// Builds mTLS + OAuth clients from the static region configuration.
///
/// Built clients are cached per (region, subdomain) so their token cache and
/// connection pool survive between sync passes.
pub struct ClientFactory {
    config: DestinationClientConfig,
    regions: HashMap<String, RegionInstanceConfig>,
    clients: DashMap<(String, String), Arc<RemoteDestinationClient>>,
}

impl ClientFactory {
    pub fn new(
        config: DestinationClientConfig,
        regions: HashMap<String, RegionInstanceConfig>,
    ) -> Self {
        tracing::info!(
            regions = regions.len(),
            page_size = config.page_size,
            retry_attempts = config.retry_attempts,
            "Destination client factory initialized"
        );
        Self {
            config,
            regions,
            clients: DashMap::new(),
        }
    }

    fn build(&self, region: &str, subdomain: &str) -> Result<RemoteDestinationClient> {
        let instance = self.regions.get(region).ok_or_else(|| {
            DestinationClientError::Config(format!("no instance configured for region '{region}'"))
        })?;

        let token_url = token_url_for_subdomain(&instance.token_url, subdomain)?;
        let http = build_http_client(&self.config, instance.mtls.as_ref())?;

        RemoteDestinationClient::new(
            http,
            &instance.base_url,
            token_url,
            instance.credentials.clone(),
            &self.config,
        )
    }
}

impl ClientProvider for ClientFactory {
    fn client_for(&self, region: &str, subdomain: &str) -> Result<Arc<dyn DestinationApi>> {
        let key = (region.to_string(), subdomain.to_string());
        if let Some(client) = self.clients.get(&key) {
            return Ok(Arc::clone(client.value()) as Arc<dyn DestinationApi>);
        }

        let client = Arc::new(self.build(region, subdomain)?);
        let client = self.clients.entry(key).or_insert(client).value().clone();

        tracing::debug!(region, subdomain, "Built destination registry client");

        Ok(client as Arc<dyn DestinationApi>)
    }
}

/// Replace the first host label of the token URL template with `subdomain`.
///
/// `https://template.authentication.eu10.hana.ondemand.com/oauth/token` with
/// subdomain `acme` becomes `https://acme.authentication.eu10.hana.ondemand.com/oauth/token`.
pub fn token_url_for_subdomain(template: &str, subdomain: &str) -> Result<String> {
    let mut url = Url::parse(template).map_err(|e| {
        DestinationClientError::Config(format!("invalid token URL '{template}': {e}"))
    })?;

    let host = url.host_str().unwrap_or_default().to_string();
    let mut labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(DestinationClientError::Config(format!(
            "token URL '{template}' has no subdomain component"
        )));
    }
    if subdomain.is_empty() {
        return Err(DestinationClientError::Config(
            "tenant subdomain is empty".to_string(),
        ));
    }

    labels[0] = subdomain;
    url.set_host(Some(&labels.join(".")))
        .map_err(|e| DestinationClientError::Config(format!("invalid subdomain '{subdomain}': {e}")))?;

    Ok(url.to_string())
}

fn build_http_client(
    config: &DestinationClientConfig,
    mtls: Option<&MtlsIdentity>,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(10);

    if let Some(mtls) = mtls {
        let mut pem = Vec::with_capacity(mtls.cert_pem.len() + mtls.key_pem.len() + 1);
        pem.extend_from_slice(mtls.cert_pem.as_bytes());
        pem.push(b'\n');
        pem.extend_from_slice(mtls.key_pem.as_bytes());

        let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
            DestinationClientError::Config(format!("invalid client certificate/key pair: {e}"))
        })?;
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| DestinationClientError::Config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientCredentials;

    fn client_config() -> DestinationClientConfig {
        DestinationClientConfig {
            page_size: 100,
            retry_attempts: 3,
            retry_interval_ms: 10,
            request_timeout_ms: 1_000,
        }
    }

    fn region(token_url: &str) -> RegionInstanceConfig {
        RegionInstanceConfig {
            credentials: ClientCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
            token_url: token_url.to_string(),
            base_url: "https://destination.cfapps.eu10.hana.ondemand.com".to_string(),
            mtls: None,
        }
    }

    #[test]
    fn substitutes_subdomain_into_token_url() {
        let url = token_url_for_subdomain(
            "https://template.authentication.eu10.hana.ondemand.com/oauth/token",
            "acme",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://acme.authentication.eu10.hana.ondemand.com/oauth/token"
        );
    }

    #[test]
    fn keeps_port_when_substituting() {
        let url = token_url_for_subdomain("http://template.auth.local:8080/token", "acme").unwrap();
        assert_eq!(url, "http://acme.auth.local:8080/token");
    }

    #[test]
    fn rejects_unparsable_token_url() {
        assert!(matches!(
            token_url_for_subdomain("::not-a-url", "acme"),
            Err(DestinationClientError::Config(_))
        ));
    }

    #[test]
    fn rejects_token_url_without_subdomain() {
        assert!(matches!(
            token_url_for_subdomain("https://localhost/oauth/token", "acme"),
            Err(DestinationClientError::Config(_))
        ));
    }

    #[test]
    fn unknown_region_is_a_configuration_error() {
        let factory = ClientFactory::new(client_config(), HashMap::new());
        let result = factory.client_for("eu10", "acme");
        assert!(matches!(result, Err(DestinationClientError::Config(_))));
    }

    #[test]
    fn invalid_certificate_is_a_configuration_error() {
        let mut instance = region("https://template.auth.example.com/oauth/token");
        instance.mtls = Some(MtlsIdentity {
            cert_pem: "not a certificate".to_string(),
            key_pem: "not a key".to_string(),
        });
        let factory = ClientFactory::new(
            client_config(),
            HashMap::from([("eu10".to_string(), instance)]),
        );

        let result = factory.client_for("eu10", "acme");
        assert!(matches!(result, Err(DestinationClientError::Config(_))));
    }

    #[test]
    fn clients_are_cached_per_region_and_subdomain() {
        let factory = ClientFactory::new(
            client_config(),
            HashMap::from([(
                "eu10".to_string(),
                region("https://template.auth.example.com/oauth/token"),
            )]),
        );

        let first = factory.client_for("eu10", "acme").unwrap();
        let second = factory.client_for("eu10", "acme").unwrap();
        let other = factory.client_for("eu10", "globex").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
