use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings shared by every client built for a region/subdomain pair.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DestinationClientConfig {
    /// Number of destinations requested per page.
    pub page_size: u32,
    /// Total attempts per request, including the first one.
    pub retry_attempts: u32,
    /// Fixed delay between attempts in milliseconds.
    pub retry_interval_ms: u64,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl DestinationClientConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// OAuth client credentials for the client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// PEM encoded client certificate chain and private key for mTLS.
#[derive(Clone)]
pub struct MtlsIdentity {
    pub cert_pem: String,
    pub key_pem: String,
}

impl std::fmt::Debug for MtlsIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MtlsIdentity")
            .field("cert_pem", &format!("{} bytes", self.cert_pem.len()))
            .field("key_pem", &"<redacted>")
            .finish()
    }
}

/// Static per-region instance of the destination registry.
#[derive(Debug, Clone)]
pub struct RegionInstanceConfig {
    pub credentials: ClientCredentials,
    /// Token endpoint template; its first host label is replaced by the tenant subdomain.
    pub token_url: String,
    pub base_url: String,
    /// `None` only for plain-HTTP local setups.
    pub mtls: Option<MtlsIdentity>,
}
