//! `sitemap-suite serve`: run the fetch proxy.

use crate::cli::output::{self, Styled};
use crate::config::Config;
use crate::fetch::SitemapFetcher;
use crate::server::{self, FETCH_ROUTE};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Start the proxy and block until ctrl-c.
pub async fn run(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let s = Styled::new();

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = config.server.socket_addr()?;

    let fetcher = SitemapFetcher::new(config.fetch.clone()).context("failed to build HTTP client")?;
    info!(
        "starting sitemap proxy v{} (timeout {}s, max {} redirects)",
        env!("CARGO_PKG_VERSION"),
        config.fetch.timeout_secs,
        config.fetch.max_redirects
    );

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "status": "listening",
            "address": addr.to_string(),
            "endpoint": format!("http://{addr}{FETCH_ROUTE}"),
        }));
    } else if !output::is_quiet() {
        output::print_header(&s);
        eprintln!("  {} Proxy listening on http://{addr}", s.ok_sym());
        eprintln!("  POST {}", s.cyan(&format!("http://{addr}{FETCH_ROUTE}")));
        eprintln!("  {}", s.dim("Press Ctrl-C to stop."));
    }

    server::serve(addr, Arc::new(fetcher)).await?;

    if !output::is_quiet() && !output::is_json() {
        eprintln!("  {} Proxy stopped.", s.ok_sym());
    }
    Ok(())
}
