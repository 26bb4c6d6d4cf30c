//! Fetch sitemaps through a remote `/api/fetch-sitemap` deployment.

use super::{SitemapSource, SourceError};
use crate::server::{FetchResponse, FETCH_ROUTE};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use url::Url;

/// Client for a deployed fetch proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    endpoint: Url,
}

impl ProxyClient {
    /// `endpoint` is either the full fetch route or the deployment root,
    /// in which case the fetch route is appended.
    pub fn new(endpoint: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SourceError::Proxy(format!("Failed to build HTTP client: {e}")))?;
        Self::with_client(client, endpoint)
    }

    pub fn with_client(client: Client, endpoint: &str) -> Result<Self, SourceError> {
        let mut endpoint = Url::parse(endpoint)
            .map_err(|e| SourceError::Proxy(format!("Invalid proxy endpoint: {e}")))?;
        if endpoint.path() == "/" {
            endpoint.set_path(FETCH_ROUTE);
        }
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SitemapSource for ProxyClient {
    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| SourceError::Proxy(format!("Fetch error: {e}")))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        if !is_json {
            let message = if status == StatusCode::NOT_FOUND {
                "API endpoint not found. The serverless function may not be deployed correctly."
                    .to_string()
            } else {
                format!(
                    "Unexpected response from API (HTTP {}). Check your deployment.",
                    status.as_u16()
                )
            };
            return Err(SourceError::Proxy(message));
        }

        let envelope: FetchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Proxy(format!("Invalid API response: {e}")))?;

        match envelope {
            FetchResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            FetchResponse { error, .. } => Err(SourceError::Proxy(
                error.unwrap_or_else(|| "Failed to fetch sitemap".to_string()),
            )),
        }
    }
}
