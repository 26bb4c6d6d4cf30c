//! Resolve command arguments (file paths or URLs) into sitemap entries.

use crate::cli::context::AppContext;
use crate::cli::output::{self, Styled};
use crate::loader::{parse_checked, LoadedSitemap, SitemapKind};
use anyhow::{bail, Context, Result};
use sitemap_core::{parse_csv, CsvParseResult, NamedEntries, ParseResult};
use std::path::{Path, PathBuf};

/// Where a command argument points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Url(String),
}

impl Input {
    pub fn classify(arg: &str) -> Self {
        let lower = arg.trim().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Input::Url(arg.trim().to_string())
        } else {
            Input::File(PathBuf::from(arg))
        }
    }

    /// Short display name: the URL, or the file name.
    pub fn name(&self) -> String {
        match self {
            Input::Url(url) => url.clone(),
            Input::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    pub fn is_csv(&self) -> bool {
        match self {
            Input::File(path) => has_extension(path, "csv"),
            Input::Url(_) => false,
        }
    }
}

pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

pub async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn read_text(ctx: &AppContext, input: &Input) -> Result<String> {
    match input {
        Input::File(path) => read_file(path).await,
        Input::Url(url) => ctx
            .source()
            .fetch_text(url)
            .await
            .with_context(|| format!("failed to fetch {url}")),
    }
}

/// Parse a CSV file, printing row errors as warnings.
pub async fn load_csv(path: &Path) -> Result<CsvParseResult> {
    let text = read_file(path).await?;
    let parsed = parse_csv(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    report_row_errors(&parsed.errors);
    Ok(parsed)
}

fn report_row_errors(errors: &[String]) {
    if errors.is_empty() || output::is_quiet() {
        return;
    }
    let s = Styled::new();
    output::print_warning(&s, &format!("{} row(s) skipped", errors.len()));
    let shown = if output::is_verbose() { errors.len() } else { 5 };
    for err in errors.iter().take(shown) {
        eprintln!("      {}", s.dim(err));
    }
    if errors.len() > shown {
        eprintln!("      {}", s.dim(&format!("... and {} more", errors.len() - shown)));
    }
}

/// Load a single sitemap without following index references.
///
/// Returns `Ok(None)` for a sitemap index so callers can decide how to
/// report it.
pub async fn load_direct(ctx: &AppContext, arg: &str) -> Result<Option<NamedEntries>> {
    let input = Input::classify(arg);
    let name = input.name();

    if let Input::File(path) = &input {
        if input.is_csv() {
            let parsed = load_csv(path).await?;
            return Ok(Some(NamedEntries::new(name, parsed.entries)));
        }
    }

    let text = read_text(ctx, &input).await?;
    match parse_checked(&text).with_context(|| format!("failed to parse {name}"))? {
        ParseResult::Sitemap { entries } => Ok(Some(NamedEntries::new(name, entries))),
        ParseResult::Index { .. } => Ok(None),
    }
}

/// Like [`load_direct`] but rejects sitemap indexes.
pub async fn load_direct_sitemap(ctx: &AppContext, arg: &str) -> Result<NamedEntries> {
    match load_direct(ctx, arg).await? {
        Some(set) => Ok(set),
        None => bail!("{arg}: Sitemap index comparison not supported — use direct sitemaps"),
    }
}

/// Load a sitemap, expanding indexes. URLs get bare-domain fallbacks.
pub async fn load_resolved(ctx: &AppContext, arg: &str) -> Result<LoadedSitemap> {
    let input = Input::classify(arg);
    let loader = ctx.loader();

    let loaded = match &input {
        Input::Url(url) => loader.load_url(url).await,
        Input::File(path) if input.is_csv() => {
            let parsed = load_csv(path).await?;
            return Ok(LoadedSitemap {
                kind: SitemapKind::Sitemap,
                source: input.name(),
                entries: parsed.entries,
                child_count: 0,
                failed_children: 0,
            });
        }
        Input::File(path) => {
            let text = read_file(path).await?;
            loader.load_text(&text, &input.name()).await
        }
    };
    ctx.finish_progress();

    let loaded = loaded.with_context(|| format!("failed to load {}", input.name()))?;
    if loaded.failed_children > 0 && !output::is_quiet() {
        output::print_warning(
            &Styled::new(),
            &format!("Warning: {} sub-sitemap(s) failed to load", loaded.failed_children),
        );
    }
    Ok(loaded)
}
