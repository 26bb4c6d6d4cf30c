//! CSV import: one URL per row with optional lastmod, changefreq, priority.

use crate::error::{ParseError, ParseOutcome};
use crate::model::{CsvParseResult, SitemapEntry};
use url::Url;

/// Parse CSV text into sitemap entries.
///
/// The first non-empty line is treated as a header only when it mentions
/// `url` or `loc`. Rows with a blank first column are skipped silently;
/// rows whose first column is not an absolute http(s) URL are reported in
/// `errors` and skipped.
pub fn parse_csv(text: &str) -> ParseOutcome<CsvParseResult> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(ParseError::CsvTooShort);
    }

    let header = lines[0].to_lowercase();
    let start = if header.contains("url") || header.contains("loc") {
        1
    } else {
        0
    };

    let mut result = CsvParseResult::default();

    for (idx, line) in lines.iter().enumerate().skip(start) {
        let cols = split_line(line);
        let column = |i: usize| cols.get(i).map(|c| c.trim().to_string()).unwrap_or_default();

        let url = column(0);
        if url.is_empty() {
            continue;
        }

        if !is_web_url(&url) {
            result
                .errors
                .push(format!("Row {}: Invalid URL — {url}", idx + 1));
            continue;
        }

        result.entries.push(SitemapEntry {
            loc: url,
            lastmod: column(1),
            changefreq: column(2),
            priority: column(3),
        });
    }

    Ok(result)
}

/// Split a line on commas outside double quotes.
///
/// Quote characters toggle quoting and are dropped; `""` is not treated
/// as an escaped quote.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

fn is_web_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
