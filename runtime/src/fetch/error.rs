//! Failures of the remote sitemap fetch.

const MIB: u64 = 1024 * 1024;

/// Everything that can go wrong while retrieving a remote sitemap.
///
/// The `Display` text of each variant is user-facing and is what the proxy
/// returns in its `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("Access to private/internal addresses is blocked")]
    BlockedAddress { host: String },

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Sitemap not found (404). Check the URL path.")]
    NotFound,

    #[error("Access denied (403). The server blocked the request.")]
    AccessDenied,

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("File too large (max {}MB)", .limit / MIB)]
    TooLarge { limit: u64 },

    #[error("Request timed out")]
    Timeout,

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error(
        "The URL returned an HTML page instead of XML. \
         Make sure the URL points to a sitemap.xml file."
    )]
    HtmlResponse,

    #[error("The URL returned an empty response.")]
    EmptyResponse,

    #[error(
        "The URL did not return valid XML. \
         The response may be plain text, JSON, or another format."
    )]
    NotXml,

    #[error("Fetch error: {0}")]
    Network(String),
}

impl FetchError {
    pub(crate) fn malformed_url() -> Self {
        FetchError::InvalidUrl("Invalid URL format".to_string())
    }

    pub(crate) fn unsupported_scheme() -> Self {
        FetchError::InvalidUrl("Only HTTP/HTTPS URLs are supported".to_string())
    }

    /// Stable machine-readable code, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl(_) => "invalid-url",
            FetchError::BlockedAddress { .. } => "blocked-address",
            FetchError::TooManyRedirects => "too-many-redirects",
            FetchError::NotFound => "not-found",
            FetchError::AccessDenied => "access-denied",
            FetchError::HttpStatus(_) => "http-error",
            FetchError::TooLarge { .. } => "too-large",
            FetchError::Timeout => "timeout",
            FetchError::Decompression(_) => "decompression-error",
            FetchError::HtmlResponse => "html-response",
            FetchError::EmptyResponse => "empty-response",
            FetchError::NotXml => "not-xml",
            FetchError::Network(_) => "network",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
