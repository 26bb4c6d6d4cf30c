//! `sitemap-suite convert` and `csv-to-xml`: file format conversion.

use crate::cli::context::AppContext;
use crate::cli::input;
use crate::cli::output::{self, Styled};
use anyhow::{bail, Result};
use sitemap_core::export::to_xml;
use sitemap_core::{export, ExportFormat};
use std::path::Path;

/// Parse a local sitemap (resolving an index through the fetcher) and export it.
pub async fn run(
    ctx: &AppContext,
    input_path: &Path,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let loaded = input::load_resolved(ctx, &input_path.to_string_lossy()).await?;
    output::write_document(output_path, &export(&loaded.entries, format))?;

    if output_path.is_some() {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "input": input_path.display().to_string(),
                "format": format,
                "mimeType": format.mime_type(),
                "urls": loaded.entries.len(),
            }));
        } else if !output::is_quiet() {
            let s = Styled::new();
            eprintln!(
                "  {} Converted {} URLs to {}",
                s.ok_sym(),
                output::format_count(loaded.entries.len()),
                format.extension().to_uppercase()
            );
        }
    }
    Ok(())
}

/// Build a sitemap XML document from a CSV URL list.
pub async fn csv_to_xml(input_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let parsed = input::load_csv(input_path).await?;
    if parsed.entries.is_empty() {
        bail!("No valid URLs to convert");
    }
    output::write_document(output_path, &to_xml(&parsed.entries))?;

    if output::is_json() && output_path.is_some() {
        output::print_json(&serde_json::json!({
            "urls": parsed.entries.len(),
            "errors": parsed.errors,
        }));
    } else if !output::is_quiet() && !output::is_json() {
        let s = Styled::new();
        eprintln!(
            "  {} Sitemap XML generated with {} URLs",
            s.ok_sym(),
            output::format_count(parsed.entries.len())
        );
    }
    Ok(())
}
