//! Core sitemap pipeline.
//!
//! Parses XML sitemaps, sitemap indexes and CSV URL lists into a canonical
//! [`SitemapEntry`] model, then diffs, merges, exports and summarizes those
//! entries. Everything here is synchronous and free of I/O; fetching remote
//! documents lives in the runtime crate.

pub mod analytics;
pub mod compare;
pub mod error;
pub mod export;
pub mod merge;
pub mod model;
pub mod parser;

pub use analytics::{analyze, SitemapStats};
pub use compare::{compare, generate_report, generate_report_at};
pub use error::{ParseError, ParseOutcome};
pub use export::{export, ExportFormat};
pub use merge::{merge, MergeOptions};
pub use model::*;
pub use parser::{looks_like_html, parse_csv, parse_xml};
