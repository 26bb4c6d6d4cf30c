//! Summary statistics over a set of sitemap entries.

use crate::model::SitemapEntry;
use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

/// Change frequencies in display order; anything else follows in first-seen order.
pub const KNOWN_FREQUENCIES: [&str; 7] =
    ["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"];

/// Number of domains reported in [`SitemapStats::top_domains`].
pub const TOP_DOMAIN_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCoverage {
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    pub lastmod: FieldCoverage,
    pub changefreq: FieldCoverage,
    pub priority: FieldCoverage,
}

/// Priority bands: high ≥ 0.7, medium 0.4–0.7, low < 0.4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBands {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub oldest: Option<String>,
    pub newest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapStats {
    pub total: usize,
    pub domain_count: usize,
    pub https_percent: f64,
    pub avg_priority: Option<f64>,
    pub coverage: Coverage,
    /// Lowercased change frequency → count, in display order.
    pub freq_dist: Vec<(String, usize)>,
    pub priority_dist: PriorityBands,
    /// Most common hosts, largest first.
    pub top_domains: Vec<(String, usize)>,
    pub date_range: DateRange,
}

/// Compute statistics for `entries`. Returns `None` for an empty slice.
pub fn analyze(entries: &[SitemapEntry]) -> Option<SitemapStats> {
    if entries.is_empty() {
        return None;
    }
    let total = entries.len();

    let mut domains: IndexMap<String, usize> = IndexMap::new();
    let mut https = 0usize;
    let mut frequencies: IndexMap<String, usize> = IndexMap::new();
    let mut priorities = Vec::new();
    let mut dates: Vec<&str> = Vec::new();
    let (mut with_lastmod, mut with_changefreq, mut with_priority) = (0, 0, 0);

    for e in entries {
        if let Ok(url) = Url::parse(&e.loc) {
            if let Some(host) = url.host_str() {
                *domains.entry(host.to_string()).or_default() += 1;
            }
            if url.scheme() == "https" {
                https += 1;
            }
        }

        if !e.lastmod.is_empty() {
            with_lastmod += 1;
            dates.push(&e.lastmod);
        }
        if !e.changefreq.is_empty() {
            with_changefreq += 1;
            *frequencies.entry(e.changefreq.to_lowercase()).or_default() += 1;
        }
        if !e.priority.is_empty() {
            with_priority += 1;
            if let Some(p) = e.priority_value() {
                priorities.push(p);
            }
        }
    }

    let mut bands = PriorityBands::default();
    for p in &priorities {
        match *p {
            p if p >= 0.7 => bands.high += 1,
            p if p >= 0.4 => bands.medium += 1,
            _ => bands.low += 1,
        }
    }

    let avg_priority = (!priorities.is_empty())
        .then(|| priorities.iter().sum::<f64>() / priorities.len() as f64);

    let mut top_domains: Vec<(String, usize)> = domains.iter().map(|(d, c)| (d.clone(), *c)).collect();
    top_domains.sort_by(|a, b| b.1.cmp(&a.1));
    top_domains.truncate(TOP_DOMAIN_LIMIT);

    dates.sort_unstable();

    Some(SitemapStats {
        total,
        domain_count: domains.len(),
        https_percent: percent(https, total),
        avg_priority,
        coverage: Coverage {
            lastmod: coverage(with_lastmod, total),
            changefreq: coverage(with_changefreq, total),
            priority: coverage(with_priority, total),
        },
        freq_dist: order_frequencies(frequencies),
        priority_dist: bands,
        top_domains,
        date_range: DateRange {
            oldest: dates.first().map(|d| d.to_string()),
            newest: dates.last().map(|d| d.to_string()),
        },
    })
}

fn order_frequencies(mut counts: IndexMap<String, usize>) -> Vec<(String, usize)> {
    let mut ordered = Vec::with_capacity(counts.len());
    for known in KNOWN_FREQUENCIES {
        if let Some(count) = counts.shift_remove(known) {
            ordered.push((known.to_string(), count));
        }
    }
    ordered.extend(counts);
    ordered
}

fn coverage(count: usize, total: usize) -> FieldCoverage {
    FieldCoverage {
        count,
        pct: percent(count, total),
    }
}

/// Percentage rounded to one decimal place.
fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
