//! `sitemap-suite merge <inputs>...`: combine sitemaps into one.

use crate::cli::context::AppContext;
use crate::cli::input;
use crate::cli::output::{self, Styled};
use anyhow::{bail, Result};
use sitemap_core::{export, merge, ExportFormat, MergeOptions};
use std::path::Path;

pub async fn run(
    ctx: &AppContext,
    inputs: &[String],
    options: MergeOptions,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let s = Styled::new();
    let mut sets = Vec::with_capacity(inputs.len());

    for arg in inputs {
        match input::load_direct(ctx, arg).await? {
            Some(set) => sets.push(set),
            None => {
                if !output::is_quiet() {
                    output::print_warning(&s, &format!("Skipping sitemap index {arg}"));
                }
            }
        }
    }

    if sets.len() < 2 {
        bail!("Provide at least 2 sitemaps to merge");
    }

    let result = merge(&sets, options);
    output::write_document(output_path, &export(&result.entries, format))?;

    if output::is_json() {
        if output_path.is_some() {
            output::print_json(&serde_json::json!({
                "totalInput": result.total_input,
                "uniqueCount": result.unique_count,
                "duplicatesRemoved": result.duplicates_removed,
                "keptBySource": count_by_source(&result.sources),
            }));
        }
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::print_section(&s, "Merge");
    output::print_row("Total input", &output::format_count(result.total_input));
    output::print_row("Unique URLs", &output::format_count(result.unique_count));
    output::print_row(
        "Duplicates removed",
        &output::format_count(result.duplicates_removed),
    );
    if output::is_verbose() {
        for (source, count) in count_by_source(&result.sources) {
            output::print_row(&format!("  from {source}"), &output::format_count(count));
        }
    }
    eprintln!();
    eprintln!(
        "  {} Merged {} unique URLs",
        s.ok_sym(),
        output::format_count(result.unique_count)
    );
    Ok(())
}

/// Kept entries per input, in input order.
fn count_by_source(sources: &[String]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for source in sources {
        match counts.iter_mut().find(|(name, _)| name == source) {
            Some((_, count)) => *count += 1,
            None => counts.push((source.clone(), 1)),
        }
    }
    counts
}
