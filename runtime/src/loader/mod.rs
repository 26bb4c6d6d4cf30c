//! Caller-side loading pipeline.
//!
//! Takes raw text (or a URL), rejects obvious non-sitemaps, parses, and
//! expands sitemap indexes by fetching each child in order. Child failures
//! are counted rather than fatal.

pub mod candidates;
pub mod proxy_client;

pub use candidates::{candidates, SitemapCandidates};
pub use proxy_client::ProxyClient;

use crate::fetch::{FetchError, SitemapFetcher};
use async_trait::async_trait;
use serde::Serialize;
use sitemap_core::{looks_like_html, parse_xml, ParseError, ParseResult, SitemapEntry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Failure to obtain raw sitemap text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Proxy(String),
}

/// Anything that can turn a URL into sitemap text.
#[async_trait]
pub trait SitemapSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, SourceError>;
}

#[async_trait]
impl SitemapSource for SitemapFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        Ok(self.fetch(url).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(
        "Received an HTML page instead of a sitemap XML. \
         The URL may be incorrect, or the site may be blocking automated requests."
    )]
    HtmlPage,

    #[error(
        "The response is not valid XML. \
         It may be plain text, JSON, or an unsupported format."
    )]
    NotXml,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(
        "Could not find a sitemap at {input}. Tried /sitemap.xml and /sitemap_index.xml. \
         Please provide the full sitemap URL."
    )]
    NotFound { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapKind {
    Index,
    Sitemap,
}

/// Entries gathered from one sitemap or from all children of an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedSitemap {
    pub kind: SitemapKind,
    pub source: String,
    pub entries: Vec<SitemapEntry>,
    /// Number of child sitemaps referenced by an index (0 for a plain sitemap).
    pub child_count: usize,
    pub failed_children: usize,
}

/// Progress callbacks for long loads. All methods default to no-ops.
pub trait LoadObserver: Send + Sync {
    fn trying(&self, _url: &str) {}
    fn index_found(&self, _children: usize) {}
    fn child_started(&self, _position: usize, _url: &str) {}
    fn child_finished(&self, _url: &str, _ok: bool) {}
    fn index_done(&self, _entries: usize, _failed: usize) {}
}

/// Reject HTML and non-markup text, then parse.
pub fn parse_checked(text: &str) -> Result<ParseResult, LoadError> {
    if looks_like_html(text) {
        return Err(LoadError::HtmlPage);
    }
    if !text.trim_start().starts_with('<') {
        return Err(LoadError::NotXml);
    }
    Ok(parse_xml(text)?)
}

struct Silent;

impl LoadObserver for Silent {}

/// Loads sitemaps from a [`SitemapSource`].
pub struct SitemapLoader {
    source: Arc<dyn SitemapSource>,
    observer: Arc<dyn LoadObserver>,
}

impl SitemapLoader {
    pub fn new(source: Arc<dyn SitemapSource>) -> Self {
        Self {
            source,
            observer: Arc::new(Silent),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Parse `text` (named `source_name` in the result), resolving an index
    /// through the source.
    pub async fn load_text(&self, text: &str, source_name: &str) -> Result<LoadedSitemap, LoadError> {
        let refs = match parse_checked(text)? {
            ParseResult::Sitemap { entries } => {
                return Ok(LoadedSitemap {
                    kind: SitemapKind::Sitemap,
                    source: source_name.to_string(),
                    entries,
                    child_count: 0,
                    failed_children: 0,
                });
            }
            ParseResult::Index { refs } => refs,
        };

        info!(source = source_name, children = refs.len(), "sitemap index found");
        self.observer.index_found(refs.len());

        let mut entries = Vec::new();
        let mut failed = 0usize;
        for (position, child) in refs.iter().enumerate() {
            self.observer.child_started(position, &child.loc);
            let ok = match self.load_child(&child.loc).await {
                Ok(Some(mut child_entries)) => {
                    entries.append(&mut child_entries);
                    true
                }
                Ok(None) => {
                    debug!(url = %child.loc, "skipping nested sitemap index");
                    true
                }
                Err(e) => {
                    warn!(url = %child.loc, error = %e, "failed to load child sitemap");
                    failed += 1;
                    false
                }
            };
            self.observer.child_finished(&child.loc, ok);
        }
        self.observer.index_done(entries.len(), failed);

        if failed > 0 {
            warn!(failed, total = refs.len(), "some child sitemaps failed to load");
        }
        if entries.is_empty() {
            return Err(ParseError::NoUrls.into());
        }

        Ok(LoadedSitemap {
            kind: SitemapKind::Index,
            source: source_name.to_string(),
            entries,
            child_count: refs.len(),
            failed_children: failed,
        })
    }

    /// `Ok(None)` for a nested index, which is not followed.
    async fn load_child(&self, url: &str) -> Result<Option<Vec<SitemapEntry>>, LoadError> {
        let text = self.source.fetch_text(url).await?;
        match parse_xml(&text)? {
            ParseResult::Sitemap { entries } => Ok(Some(entries)),
            ParseResult::Index { .. } => Ok(None),
        }
    }

    /// Fetch and load `input`, trying conventional paths for a bare domain.
    pub async fn load_url(&self, input: &str) -> Result<LoadedSitemap, LoadError> {
        let targets = candidates(input);

        for url in targets.iter() {
            self.observer.trying(url);
            match self.fetch_and_load(url).await {
                Ok(loaded) => return Ok(loaded),
                Err(e) if !targets.was_bare_domain => return Err(e),
                Err(e) => debug!(%url, error = %e, "candidate failed"),
            }
        }

        Err(LoadError::NotFound {
            input: input.trim().to_string(),
        })
    }

    async fn fetch_and_load(&self, url: &str) -> Result<LoadedSitemap, LoadError> {
        let text = self.source.fetch_text(url).await?;
        self.load_text(&text, url).await
    }
}
