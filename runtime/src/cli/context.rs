//! Per-invocation state shared by the subcommands.

use crate::cli::output;
use crate::cli::progress::LoadProgress;
use crate::config::Config;
use crate::fetch::SitemapFetcher;
use crate::loader::{ProxyClient, SitemapLoader, SitemapSource};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

pub struct AppContext {
    pub config: Config,
    source: Arc<dyn SitemapSource>,
    progress: Arc<LoadProgress>,
}

impl AppContext {
    /// Fetch in-process, or through the remote proxy at `proxy` when given.
    pub fn new(config: Config, proxy: Option<&str>) -> Result<Self> {
        let source: Arc<dyn SitemapSource> = match proxy {
            Some(endpoint) => Arc::new(
                ProxyClient::new(endpoint).context("failed to configure proxy client")?,
            ),
            None => Arc::new(
                SitemapFetcher::new(config.fetch.clone()).context("failed to build HTTP client")?,
            ),
        };
        Ok(Self::with_source(config, source))
    }

    pub fn with_source(config: Config, source: Arc<dyn SitemapSource>) -> Self {
        Self {
            config,
            source,
            progress: Arc::new(LoadProgress::new()),
        }
    }

    pub fn load(config_path: Option<&Path>, proxy: Option<&str>) -> Result<Self> {
        Self::new(Config::load(config_path)?, proxy)
    }

    pub fn source(&self) -> Arc<dyn SitemapSource> {
        self.source.clone()
    }

    /// A loader reporting progress on stderr unless output is quiet or JSON.
    pub fn loader(&self) -> SitemapLoader {
        let loader = SitemapLoader::new(self.source());
        if output::is_quiet() || output::is_json() {
            loader
        } else {
            loader.with_observer(self.progress.clone())
        }
    }

    pub fn finish_progress(&self) {
        self.progress.finish();
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new(Config::default(), None).unwrap()
    }
}
