use async_trait::async_trait;
use dsync_domain::DestinationRecord;
use serde_json::value::RawValue;
use url::Url;

use crate::{
    config::{ClientCredentials, DestinationClientConfig},
    error::{DestinationClientError, Result},
    retry::{AttemptError, RetryPolicy},
    token::ClientCredentialsTokenSource,
};

/// Response header carrying the total number of pages.
pub const PAGE_COUNT_HEADER: &str = "Page-Count";

const SUBACCOUNT_DESTINATIONS_PATH: &str = "destination-configuration/v1/subaccountDestinations";
const DESTINATIONS_PATH: &str = "destination-configuration/v1/destinations";

/// One page of the subaccount destination listing.
#[derive(Debug, Clone)]
pub struct DestinationPage {
    pub destinations: Vec<DestinationRecord>,
    /// Total page count exactly as the registry sent it.
    pub page_count: String,
}

/// Operations the sync engine needs from a destination registry.
#[async_trait]
pub trait DestinationApi: Send + Sync {
    /// Fetch a 1-based page of subaccount destinations.
    async fn fetch_page(&self, page: u32) -> Result<DestinationPage>;

    /// Fetch one destination including its authentication material.
    async fn fetch_sensitive(&self, name: &str) -> Result<Box<RawValue>>;
}

/// Authenticated client for one (region, subdomain) destination registry.
pub struct RemoteDestinationClient {
    http: reqwest::Client,
    base_url: Url,
    page_size: u32,
    retry: RetryPolicy,
    tokens: ClientCredentialsTokenSource,
}

impl RemoteDestinationClient {
    /// Create a client from an already configured HTTP client.
    ///
    /// `token_url` must already carry the tenant subdomain.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        token_url: String,
        credentials: ClientCredentials,
        config: &DestinationClientConfig,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            DestinationClientError::Config(format!("invalid base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DestinationClientError::Config(format!(
                "base URL '{base_url}' cannot be a base"
            )));
        }

        Ok(Self {
            tokens: ClientCredentialsTokenSource::new(http.clone(), token_url, credentials),
            http,
            base_url,
            page_size: config.page_size.max(1),
            retry: RetryPolicy::new(config.retry_attempts, config.retry_interval()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.extend(segment.split('/'));
            }
        }
        url
    }

    fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint(&[SUBACCOUNT_DESTINATIONS_PATH]);
        url.query_pairs_mut()
            .append_pair("$pageCount", "true")
            .append_pair("$page", &page.to_string())
            .append_pair("$pageSize", &self.page_size.to_string());
        url
    }

    async fn fetch_page_once(&self, url: &Url) -> std::result::Result<DestinationPage, AttemptError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::from_status(status, body));
        }

        let page_count = response
            .headers()
            .get(PAGE_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                AttemptError::Permanent(DestinationClientError::MissingHeader(PAGE_COUNT_HEADER))
            })?;

        let bytes = response.bytes().await?;
        let destinations: Vec<DestinationRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            AttemptError::Permanent(DestinationClientError::Decode(format!(
                "destination page: {e}"
            )))
        })?;

        Ok(DestinationPage {
            destinations,
            page_count,
        })
    }

    async fn fetch_sensitive_once(
        &self,
        url: &Url,
        name: &str,
    ) -> std::result::Result<Box<RawValue>, AttemptError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            404 => {
                return Err(AttemptError::Permanent(DestinationClientError::NotFound(
                    name.to_string(),
                )));
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                return Err(AttemptError::from_status(status, body));
            }
        }

        let body = response.text().await?;
        RawValue::from_string(body).map_err(|e| {
            AttemptError::Permanent(DestinationClientError::Decode(format!(
                "destination '{name}': {e}"
            )))
        })
    }
}

#[async_trait]
impl DestinationApi for RemoteDestinationClient {
    #[tracing::instrument(name = "destination_client.fetch_page", skip(self), level = "debug")]
    async fn fetch_page(&self, page: u32) -> Result<DestinationPage> {
        let url = self.page_url(page);
        self.retry
            .run("fetch_page", || self.fetch_page_once(&url))
            .await
    }

    #[tracing::instrument(name = "destination_client.fetch_sensitive", skip(self), level = "debug")]
    async fn fetch_sensitive(&self, name: &str) -> Result<Box<RawValue>> {
        let mut url = self.endpoint(&[DESTINATIONS_PATH]);
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(name);
        }
        self.retry
            .run("fetch_sensitive", || self.fetch_sensitive_once(&url, name))
            .await
    }
}
