//! Sitemap Suite runtime: the SSRF-hardened fetch proxy, its HTTP server,
//! the caller-side loader, and the `sitemap-suite` command line.

pub mod cli;
pub mod config;
pub mod fetch;
pub mod loader;
pub mod logging;
pub mod server;
