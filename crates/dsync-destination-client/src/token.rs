use std::time::{Duration, Instant};

use dsync_observability::record_token_refresh;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::form_urlencoded;

use crate::{config::ClientCredentials, error::DestinationClientError, retry::AttemptError};

/// Tokens are refreshed this long before the issuer-reported expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(30);
const DEFAULT_EXPIRES_IN_SECS: u64 = 300;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// OAuth2 client-credentials token source.
///
/// Credentials travel in the form body rather than a basic auth header.
pub(crate) struct ClientCredentialsTokenSource {
    http: reqwest::Client,
    token_url: String,
    credentials: ClientCredentials,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentialsTokenSource {
    pub(crate) fn new(
        http: reqwest::Client,
        token_url: String,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            http,
            token_url,
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, requesting a new one when the cached token is stale.
    pub(crate) async fn access_token(&self) -> Result<String, AttemptError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.access_token.clone());
        }

        let token = match self.request_token().await {
            Ok(token) => {
                record_token_refresh("ok");
                token
            }
            Err(error) => {
                record_token_refresh("error");
                return Err(error);
            }
        };

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
        let access_token = token.access_token;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_SKEW),
        });

        Ok(access_token)
    }

    async fn request_token(&self) -> Result<TokenResponse, AttemptError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("client_secret", &self.credentials.client_secret)
            .finish();

        let response = self
            .http
            .post(&self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = DestinationClientError::Token { status, body };
            return Err(if status >= 500 {
                AttemptError::Retryable(error)
            } else {
                AttemptError::Permanent(error)
            });
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            AttemptError::Permanent(DestinationClientError::Decode(format!(
                "token response: {e}"
            )))
        })
    }
}
