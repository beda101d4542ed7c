use crate::ports::{UpstreamApi, UpstreamResponse};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use shared::config::{Config, CredentialSource};
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// HTTP client for the Brewfather API
#[derive(Clone, Debug)]
pub struct BrewfatherClient {
    http_client: Client,
    base_url: Url,
    credentials: CredentialSource,
}

impl BrewfatherClient {
    pub fn new(base_url: &str, credentials: CredentialSource, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidConfig(format!("invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "API URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            credentials,
        })
    }

    pub fn from_config(config: &Config, credentials: CredentialSource) -> Result<Self> {
        Self::new(&config.api_url, credentials, config.request_timeout)
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }
        url
    }
}

#[async_trait]
impl UpstreamApi for BrewfatherClient {
    async fn get(&self, path: &[&str], query: &[(&str, &str)]) -> Result<UpstreamResponse> {
        let credentials = self.credentials.resolve()?;
        let url = self.endpoint(path);

        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::UpstreamTransport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::UpstreamTransport(e.to_string()))?;

        let body = serde_json::from_slice(&bytes)?;

        Ok(UpstreamResponse::new(status, body))
    }
}
