//! Server-side sitemap retrieval with private-address blocking.
//!
//! The HTTP client never follows redirects on its own: every hop is
//! resolved here so the destination guard sees each target before a
//! connection is made.

pub mod body;
pub mod error;
pub mod guard;

pub use error::FetchError;
pub use guard::{check_destination, parse_target};

use body::{CappedBuffer, ContentEncoding};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, LOCATION};
use reqwest::{redirect, Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const ACCEPT_VALUE: &str = "application/xml, text/xml, */*";
const ACCEPT_ENCODING_VALUE: &str = "gzip, deflate, br";

/// Fetcher limits and identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_redirects: u32,
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 5,
            max_body_bytes: 50 * 1024 * 1024,
            user_agent: "SitemapToolsSuite/1.0".to_string(),
        }
    }
}

/// Retrieves remote sitemap text. Holds no per-request state and is
/// shared behind an `Arc` by the server.
#[derive(Debug, Clone)]
pub struct SitemapFetcher {
    client: Client,
    config: FetchConfig,
}

impl SitemapFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Self::client_builder(&config).build()?;
        Ok(Self { client, config })
    }

    /// Client settings the fetcher relies on. Exposed so callers can add
    /// options (DNS overrides in tests) without losing the redirect policy.
    pub fn client_builder(config: &FetchConfig) -> ClientBuilder {
        Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
    }

    /// Use a pre-built client. It must not follow redirects.
    pub fn with_client(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `url` with the configured redirect budget.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = parse_target(url)?;
        self.fetch_with_redirects(target, self.config.max_redirects)
            .await
    }

    /// Fetch `url`, following at most `max_redirects` redirects.
    pub async fn fetch_with_redirects(
        &self,
        url: Url,
        max_redirects: u32,
    ) -> Result<String, FetchError> {
        let mut current = url;
        let mut remaining = max_redirects;

        loop {
            guard::ensure_web_scheme(&current)?;
            check_destination(&current)?;
            debug!(url = %current, remaining, "fetch hop");

            let response = self
                .client
                .get(current.clone())
                .header(ACCEPT, ACCEPT_VALUE)
                .header(ACCEPT_ENCODING, ACCEPT_ENCODING_VALUE)
                .send()
                .await
                .inspect_err(|e| warn!(url = %current, error = %e, "request failed"))?;

            let status = response.status();
            if is_redirect(status) {
                if let Some(location) = response.headers().get(LOCATION) {
                    let next = location
                        .to_str()
                        .ok()
                        .and_then(|loc| current.join(loc).ok())
                        .ok_or_else(|| FetchError::InvalidUrl("Invalid redirect URL".to_string()))?;
                    remaining = remaining
                        .checked_sub(1)
                        .ok_or(FetchError::TooManyRedirects)?;
                    debug!(from = %current, to = %next, "following redirect");
                    current = next;
                    continue;
                }
            }

            match status {
                StatusCode::OK => {}
                StatusCode::NOT_FOUND => return Err(FetchError::NotFound),
                StatusCode::FORBIDDEN => return Err(FetchError::AccessDenied),
                other => return Err(FetchError::HttpStatus(other.as_u16())),
            }

            let text = self.read_body(response).await?;
            body::validate_body(&text)?;
            debug!(url = %current, bytes = text.len(), "fetched sitemap");
            return Ok(text);
        }
    }

    async fn read_body(&self, mut response: reqwest::Response) -> Result<String, FetchError> {
        let limit = self.config.max_body_bytes;
        body::check_declared_length(response.content_length(), limit)?;

        let encoding = ContentEncoding::from_header(
            response
                .headers()
                .get(CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok()),
        );

        // Dropping the response on overflow aborts the transfer.
        let mut raw = CappedBuffer::new(limit);
        while let Some(chunk) = response.chunk().await? {
            raw.push(&chunk)?;
        }
        debug!(bytes = raw.len(), ?encoding, "body received");

        let raw = raw.into_inner();
        tokio::task::spawn_blocking(move || body::decode(raw, encoding, limit))
            .await
            .map_err(|e| FetchError::Decompression(e.to_string()))?
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.max_body_bytes, 52_428_800);
        assert_eq!(config.user_agent, "SitemapToolsSuite/1.0");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FetchConfig = serde_json::from_str(r#"{"max_redirects": 2}"#).unwrap();
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_redirect_statuses() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_redirect(StatusCode::from_u16(code).unwrap()));
        }
        assert!(!is_redirect(StatusCode::NOT_MODIFIED));
        assert!(!is_redirect(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_blocked_before_network() {
        let fetcher = SitemapFetcher::new(FetchConfig::default()).unwrap();
        let err = fetcher
            .fetch("http://169.254.169.254/latest/meta-data/")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::BlockedAddress {
                host: "169.254.169.254".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_targets() {
        let fetcher = SitemapFetcher::new(FetchConfig::default()).unwrap();
        assert_eq!(
            fetcher.fetch("file:///etc/passwd").await,
            Err(FetchError::unsupported_scheme())
        );
        assert_eq!(
            fetcher.fetch("::not a url::").await,
            Err(FetchError::malformed_url())
        );
    }
}
