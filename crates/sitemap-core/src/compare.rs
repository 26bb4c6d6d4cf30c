//! Structural diff between two sitemap versions and its Markdown report.

use crate::model::{DiffResult, EntryField, FieldChange, ModifiedPair, SitemapEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::fmt::Write;

/// Placeholder shown in reports for an empty field value.
pub const EMPTY_SENTINEL: &str = "(empty)";

/// Compare an old and a new entry collection keyed by `loc`.
///
/// Duplicate locations within one side collapse to the last entry while
/// keeping the position of the first. Added, modified and unchanged follow
/// the order of `new`; removed follows the order of `old`.
pub fn compare(old: &[SitemapEntry], new: &[SitemapEntry]) -> DiffResult {
    let old_map = by_location(old);
    let new_map = by_location(new);

    let mut diff = DiffResult::default();

    for (url, new_entry) in &new_map {
        match old_map.get(url) {
            None => diff.added.push((*new_entry).clone()),
            Some(old_entry) => {
                let changes = field_changes(old_entry, new_entry);
                if changes.is_empty() {
                    diff.unchanged.push((*new_entry).clone());
                } else {
                    diff.modified.push(ModifiedPair {
                        url: (*url).to_string(),
                        changes,
                        old_entry: (*old_entry).clone(),
                        new_entry: (*new_entry).clone(),
                    });
                }
            }
        }
    }

    diff.removed = old_map
        .iter()
        .filter(|(url, _)| !new_map.contains_key(*url))
        .map(|(_, entry)| (*entry).clone())
        .collect();

    diff
}

fn by_location(entries: &[SitemapEntry]) -> IndexMap<&str, &SitemapEntry> {
    let mut map = IndexMap::with_capacity(entries.len());
    for entry in entries {
        map.insert(entry.loc.as_str(), entry);
    }
    map
}

fn field_changes(old: &SitemapEntry, new: &SitemapEntry) -> Vec<FieldChange> {
    EntryField::ALL
        .iter()
        .filter(|field| old.field(**field) != new.field(**field))
        .map(|field| FieldChange {
            field: *field,
            from: old.field(*field).to_string(),
            to: new.field(*field).to_string(),
        })
        .collect()
}

/// Render a diff as a Markdown report.
///
/// Output depends only on the diff, so the same input always renders the
/// same text.
pub fn generate_report(diff: &DiffResult) -> String {
    render_report(diff, None)
}

/// Render a diff as a Markdown report stamped with a generation time.
pub fn generate_report_at(diff: &DiffResult, generated: DateTime<Utc>) -> String {
    render_report(diff, Some(generated))
}

fn render_report(diff: &DiffResult, generated: Option<DateTime<Utc>>) -> String {
    let mut md = String::from("# Sitemap Comparison Report\n\n");
    if let Some(ts) = generated {
        let _ = writeln!(md, "Generated: {}\n", ts.to_rfc3339_opts(SecondsFormat::Millis, true));
    }

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Count |\n|--------|-------|\n");
    let _ = writeln!(md, "| Added | {} |", diff.added.len());
    let _ = writeln!(md, "| Removed | {} |", diff.removed.len());
    let _ = writeln!(md, "| Modified | {} |", diff.modified.len());
    let _ = writeln!(md, "| Unchanged | {} |\n", diff.unchanged.len());

    if !diff.added.is_empty() {
        md.push_str("## Added URLs\n\n");
        for entry in &diff.added {
            let _ = writeln!(md, "- {}", entry.loc);
        }
        md.push('\n');
    }

    if !diff.removed.is_empty() {
        md.push_str("## Removed URLs\n\n");
        for entry in &diff.removed {
            let _ = writeln!(md, "- {}", entry.loc);
        }
        md.push('\n');
    }

    if !diff.modified.is_empty() {
        md.push_str("## Modified URLs\n\n");
        for pair in &diff.modified {
            let _ = writeln!(md, "### {}", pair.url);
            for change in &pair.changes {
                let _ = writeln!(
                    md,
                    "- **{}**: `{}` → `{}`",
                    change.field,
                    display_value(&change.from),
                    display_value(&change.to)
                );
            }
            md.push('\n');
        }
    }

    md
}

/// Presentation form of a field value: empty becomes [`EMPTY_SENTINEL`].
pub fn display_value(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_SENTINEL
    } else {
        value
    }
}
