//! `sitemap-suite stats <input>`: analytics for a sitemap.

use crate::cli::context::AppContext;
use crate::cli::input;
use crate::cli::output::{self, Styled};
use anyhow::{bail, Result};
use sitemap_core::analytics::FieldCoverage;
use sitemap_core::{analyze, SitemapStats};

pub async fn run(ctx: &AppContext, arg: &str) -> Result<()> {
    let loaded = input::load_resolved(ctx, arg).await?;
    let Some(stats) = analyze(&loaded.entries) else {
        bail!("No URLs found in {}", loaded.source);
    };

    if output::is_json() {
        output::print_json(&stats);
    } else if !output::is_quiet() {
        print_stats(&Styled::new(), &loaded.source, &stats);
    }
    Ok(())
}

fn coverage_line(c: &FieldCoverage) -> String {
    format!("{} ({}%)", output::format_count(c.count), c.pct)
}

fn print_stats(s: &Styled, source: &str, stats: &SitemapStats) {
    output::print_header(s);
    output::print_row("Source", source);
    output::print_row("Total URLs", &output::format_count(stats.total));
    output::print_row("Domains", &stats.domain_count.to_string());
    output::print_row("HTTPS", &format!("{}%", stats.https_percent));
    if let Some(avg) = stats.avg_priority {
        output::print_row("Avg priority", &format!("{avg:.2}"));
    }

    output::print_section(s, "Field coverage");
    output::print_row("lastmod", &coverage_line(&stats.coverage.lastmod));
    output::print_row("changefreq", &coverage_line(&stats.coverage.changefreq));
    output::print_row("priority", &coverage_line(&stats.coverage.priority));

    if !stats.freq_dist.is_empty() {
        output::print_section(s, "Change frequency");
        for (freq, count) in &stats.freq_dist {
            output::print_row(freq, &output::format_count(*count));
        }
    }

    let bands = &stats.priority_dist;
    if bands.high + bands.medium + bands.low > 0 {
        output::print_section(s, "Priority");
        output::print_row("high (>= 0.7)", &bands.high.to_string());
        output::print_row("medium (0.4-0.7)", &bands.medium.to_string());
        output::print_row("low (< 0.4)", &bands.low.to_string());
    }

    if !stats.top_domains.is_empty() {
        output::print_section(s, "Top domains");
        for (domain, count) in &stats.top_domains {
            output::print_row(domain, &output::format_count(*count));
        }
    }

    if let (Some(oldest), Some(newest)) = (&stats.date_range.oldest, &stats.date_range.newest) {
        output::print_section(s, "Last modified");
        output::print_row("oldest", oldest);
        output::print_row("newest", newest);
    }
}
