//! `sitemap-suite fetch <url>`: load a remote sitemap and summarize or export it.

use crate::cli::context::AppContext;
use crate::cli::input;
use crate::cli::output::{self, Styled};
use crate::loader::{LoadedSitemap, SitemapKind};
use anyhow::Result;
use sitemap_core::{export, ExportFormat};
use std::path::Path;
use std::time::Instant;

const PREVIEW_ROWS: usize = 10;

pub async fn run(
    ctx: &AppContext,
    url: &str,
    format: Option<ExportFormat>,
    output_path: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let loaded = input::load_resolved(ctx, url).await?;

    if let Some(format) = format {
        output::write_document(output_path, &export(&loaded.entries, format))?;
        if output_path.is_some() && output::is_json() {
            print_summary_json(&loaded, start.elapsed());
        }
        return Ok(());
    }

    if output::is_json() {
        print_summary_json(&loaded, start.elapsed());
    } else if !output::is_quiet() {
        print_summary(&Styled::new(), &loaded, start.elapsed());
    }
    Ok(())
}

fn print_summary(s: &Styled, loaded: &LoadedSitemap, elapsed: std::time::Duration) {
    eprintln!(
        "  {} Loaded {} URLs in {:.1}s",
        s.ok_sym(),
        output::format_count(loaded.entries.len()),
        elapsed.as_secs_f64()
    );
    eprintln!();
    output::print_row("Source", &loaded.source);
    let kind = match loaded.kind {
        SitemapKind::Index => format!(
            "Sitemap Index ({} sitemaps, {} failed)",
            loaded.child_count, loaded.failed_children
        ),
        SitemapKind::Sitemap => "Sitemap".to_string(),
    };
    output::print_row("Type", &kind);

    output::print_section(s, "Preview");
    for entry in loaded.entries.iter().take(PREVIEW_ROWS) {
        let lastmod = if entry.lastmod.is_empty() { "-" } else { &entry.lastmod };
        eprintln!("    {:<60} {}", entry.loc, s.dim(lastmod));
    }
    if loaded.entries.len() > PREVIEW_ROWS {
        eprintln!(
            "    {}",
            s.dim(&format!("... {} more", loaded.entries.len() - PREVIEW_ROWS))
        );
    }
    eprintln!();
    eprintln!("  Export with: sitemap-suite fetch {} --format csv", loaded.source);
}

fn print_summary_json(loaded: &LoadedSitemap, elapsed: std::time::Duration) {
    output::print_json(&serde_json::json!({
        "source": loaded.source,
        "kind": loaded.kind,
        "urls": loaded.entries.len(),
        "childCount": loaded.child_count,
        "failedChildren": loaded.failed_children,
        "durationMs": elapsed.as_millis() as u64,
    }));
}
