//! Union of several sitemaps with URL de-duplication.

use crate::model::{MergeResult, NamedEntries, SitemapEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Priority assumed for entries without a usable numeric priority.
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// Merge policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Collapse entries sharing a `loc` into one.
    pub remove_duplicates: bool,
    /// Order the result by descending priority.
    pub sort_by_priority: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            sort_by_priority: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MergeKey<'a> {
    Location(&'a str),
    Occurrence(usize),
}

struct Kept<'a> {
    entry: &'a SitemapEntry,
    source: &'a str,
}

/// Merge entry sets in the order given.
///
/// With de-duplication, the first occurrence of a URL is kept unless a later
/// one carries a non-empty `lastmod` that sorts after the kept one as a
/// plain string. The replacement takes over the original position.
pub fn merge(sets: &[NamedEntries], options: MergeOptions) -> MergeResult {
    let mut total_input = 0usize;
    let mut kept: IndexMap<MergeKey<'_>, Kept<'_>> = IndexMap::new();

    for set in sets {
        for entry in &set.entries {
            total_input += 1;
            let candidate = Kept {
                entry,
                source: &set.name,
            };

            if !options.remove_duplicates {
                kept.insert(MergeKey::Occurrence(total_input), candidate);
                continue;
            }

            let key = MergeKey::Location(&entry.loc);
            match kept.get_mut(&key) {
                None => {
                    kept.insert(key, candidate);
                }
                Some(existing) => {
                    if is_newer(entry, existing.entry) {
                        *existing = candidate;
                    }
                }
            }
        }
    }

    let mut merged: Vec<Kept<'_>> = kept.into_values().collect();

    if options.sort_by_priority {
        // sort_by is stable, so equal priorities keep insertion order
        merged.sort_by(|a, b| sort_priority(b.entry).total_cmp(&sort_priority(a.entry)));
    }

    let unique_count = merged.len();
    tracing::debug!(
        total_input,
        unique_count,
        sets = sets.len(),
        "merged sitemap entries"
    );

    let (entries, sources): (Vec<_>, Vec<_>) = merged
        .into_iter()
        .map(|k| (k.entry.clone(), k.source.to_string()))
        .unzip();

    MergeResult {
        entries,
        total_input,
        unique_count,
        duplicates_removed: total_input - unique_count,
        sources,
    }
}

fn is_newer(candidate: &SitemapEntry, existing: &SitemapEntry) -> bool {
    !candidate.lastmod.is_empty() && candidate.lastmod > existing.lastmod
}

fn sort_priority(entry: &SitemapEntry) -> f64 {
    entry.priority_value().unwrap_or(DEFAULT_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str, entries: Vec<SitemapEntry>) -> NamedEntries {
        NamedEntries::new(name, entries)
    }

    #[test]
    fn test_newer_lastmod_wins_over_empty() {
        let sets = vec![
            set("a", vec![SitemapEntry::new("u1")]),
            set("b", vec![SitemapEntry::new("u1").with_lastmod("2024-01-01")]),
        ];
        let result = merge(&sets, MergeOptions::default());
        assert_eq!(result.total_input, 2);
        assert_eq!(result.unique_count, 1);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.entries[0].lastmod, "2024-01-01");
        assert_eq!(result.sources, vec!["b"]);
    }

    #[test]
    fn test_keep_duplicates() {
        let sets = vec![
            set("a", vec![SitemapEntry::new("u1")]),
            set("b", vec![SitemapEntry::new("u1").with_lastmod("2024-01-01")]),
        ];
        let options = MergeOptions {
            remove_duplicates: false,
            ..MergeOptions::default()
        };
        let result = merge(&sets, options);
        assert_eq!(result.unique_count, 2);
        assert_eq!(result.total_input, 2);
        assert_eq!(result.duplicates_removed, 0);
        assert_eq!(result.sources, vec!["a", "b"]);
    }

    #[test]
    fn test_older_or_empty_lastmod_does_not_replace() {
        let sets = vec![
            set("a", vec![SitemapEntry::new("u").with_lastmod("2024-05-01").with_priority("0.9")]),
            set("b", vec![SitemapEntry::new("u").with_lastmod("2024-01-01")]),
            set("c", vec![SitemapEntry::new("u")]),
            set("d", vec![SitemapEntry::new("u").with_lastmod("2024-05-01")]),
        ];
        let result = merge(&sets, MergeOptions::default());
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].priority, "0.9");
        assert_eq!(result.sources, vec!["a"]);
        assert_eq!(result.duplicates_removed, 3);
    }

    #[test]
    fn test_lastmod_compared_as_strings() {
        // "2024-9-01" sorts after "2024-10-01" lexicographically
        let sets = vec![
            set("a", vec![SitemapEntry::new("u").with_lastmod("2024-10-01")]),
            set("b", vec![SitemapEntry::new("u").with_lastmod("2024-9-01")]),
        ];
        let result = merge(&sets, MergeOptions::default());
        assert_eq!(result.entries[0].lastmod, "2024-9-01");
    }

    #[test]
    fn test_replacement_keeps_first_position() {
        let sets = vec![
            set("a", vec![SitemapEntry::new("x"), SitemapEntry::new("y")]),
            set("b", vec![SitemapEntry::new("x").with_lastmod("2024-01-01")]),
        ];
        let result = merge(&sets, MergeOptions::default());
        let locs: Vec<_> = result.entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, ["x", "y"]);
    }

    #[test]
    fn test_sort_by_priority_is_stable() {
        let sets = vec![set(
            "a",
            vec![
                SitemapEntry::new("low").with_priority("0.1"),
                SitemapEntry::new("none-1"),
                SitemapEntry::new("high").with_priority("1.0"),
                SitemapEntry::new("bad").with_priority("urgent"),
                SitemapEntry::new("half").with_priority("0.5"),
                SitemapEntry::new("none-2"),
            ],
        )];
        let options = MergeOptions {
            sort_by_priority: true,
            ..MergeOptions::default()
        };
        let result = merge(&sets, options);
        let locs: Vec<_> = result.entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, ["high", "none-1", "bad", "half", "none-2", "low"]);
    }

    #[test]
    fn test_empty_input() {
        let result = merge(&[], MergeOptions::default());
        assert_eq!(result.total_input, 0);
        assert!(result.entries.is_empty());
    }
}
