//! `sitemap-suite compare <old> <new>`: diff two sitemaps.

use crate::cli::context::AppContext;
use crate::cli::input;
use crate::cli::output::{self, Styled};
use anyhow::{Context, Result};
use chrono::Utc;
use sitemap_core::compare::display_value;
use sitemap_core::{compare, generate_report_at, DiffResult};
use std::path::Path;

const LIST_LIMIT: usize = 20;

pub async fn run(ctx: &AppContext, old: &str, new: &str, report: Option<&Path>) -> Result<()> {
    let old_set = input::load_direct_sitemap(ctx, old).await?;
    let new_set = input::load_direct_sitemap(ctx, new).await?;

    let diff = compare(&old_set.entries, &new_set.entries);

    if let Some(path) = report {
        let markdown = generate_report_at(&diff, Utc::now());
        std::fs::write(path, markdown)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    if output::is_json() {
        output::print_json(&diff);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    let s = Styled::new();
    eprintln!(
        "  Comparing {} ({} URLs) with {} ({} URLs)",
        s.bold(&old_set.name),
        old_set.entries.len(),
        s.bold(&new_set.name),
        new_set.entries.len()
    );
    print_diff(&s, &diff);

    if let Some(path) = report {
        eprintln!();
        eprintln!("  {} Report written to {}", s.ok_sym(), path.display());
    }
    Ok(())
}

fn limit() -> usize {
    if output::is_verbose() {
        usize::MAX
    } else {
        LIST_LIMIT
    }
}

fn print_diff(s: &Styled, diff: &DiffResult) {
    output::print_section(s, "Summary");
    output::print_check(&s.green("+"), "Added", &diff.added.len().to_string());
    output::print_check(&s.red("-"), "Removed", &diff.removed.len().to_string());
    output::print_check(&s.yellow("~"), "Modified", &diff.modified.len().to_string());
    output::print_check(s.info_sym(), "Unchanged", &diff.unchanged.len().to_string());

    if diff.is_identical() {
        eprintln!();
        eprintln!("  {} Sitemaps are identical.", s.ok_sym());
        return;
    }

    let shown = limit();
    if !diff.added.is_empty() {
        output::print_section(s, "Added URLs");
        for e in diff.added.iter().take(shown) {
            eprintln!("    {} {}", s.green("+"), e.loc);
        }
        print_more(s, diff.added.len(), shown);
    }
    if !diff.removed.is_empty() {
        output::print_section(s, "Removed URLs");
        for e in diff.removed.iter().take(shown) {
            eprintln!("    {} {}", s.red("-"), e.loc);
        }
        print_more(s, diff.removed.len(), shown);
    }
    if !diff.modified.is_empty() {
        output::print_section(s, "Modified URLs");
        for pair in diff.modified.iter().take(shown) {
            eprintln!("    {} {}", s.yellow("~"), pair.url);
            for change in &pair.changes {
                eprintln!(
                    "        {:<11} {} \u{2192} {}",
                    change.field.as_str(),
                    s.dim(display_value(&change.from)),
                    display_value(&change.to)
                );
            }
        }
        print_more(s, diff.modified.len(), shown);
    }
}

fn print_more(s: &Styled, total: usize, shown: usize) {
    if total > shown {
        eprintln!("    {}", s.dim(&format!("... {} more (use --verbose)", total - shown)));
    }
}
