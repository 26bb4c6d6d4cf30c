//! Canonical sitemap records shared by every stage of the pipeline.
//!
//! All optional fields are plain strings that default to empty, never
//! `Option`, so equality and diffing stay literal.

use serde::{Deserialize, Serialize};

/// One `<url>` record from a sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Absolute URL of the page. Never empty for a parsed entry.
    pub loc: String,
    /// Last modification date, kept exactly as written in the source.
    #[serde(default)]
    pub lastmod: String,
    /// Change frequency hint (`daily`, `weekly`, ...), case preserved.
    #[serde(default)]
    pub changefreq: String,
    /// Priority as numeric text; parsed only when sorting or exporting.
    #[serde(default)]
    pub priority: String,
}

impl SitemapEntry {
    /// Create an entry with only a location.
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for `lastmod`.
    pub fn with_lastmod(mut self, lastmod: impl Into<String>) -> Self {
        self.lastmod = lastmod.into();
        self
    }

    /// Builder-style setter for `changefreq`.
    pub fn with_changefreq(mut self, changefreq: impl Into<String>) -> Self {
        self.changefreq = changefreq.into();
        self
    }

    /// Builder-style setter for `priority`.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Numeric priority, or `None` when absent or not a number.
    pub fn priority_value(&self) -> Option<f64> {
        let trimmed = self.priority.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|p| p.is_finite())
    }

    /// Read one of the comparable metadata fields.
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Lastmod => &self.lastmod,
            EntryField::Changefreq => &self.changefreq,
            EntryField::Priority => &self.priority,
        }
    }
}

/// The metadata fields that participate in diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryField {
    Lastmod,
    Changefreq,
    Priority,
}

impl EntryField {
    /// Fields in the order they are compared and reported.
    pub const ALL: [EntryField; 3] = [
        EntryField::Lastmod,
        EntryField::Changefreq,
        EntryField::Priority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryField::Lastmod => "lastmod",
            EntryField::Changefreq => "changefreq",
            EntryField::Priority => "priority",
        }
    }
}

impl std::fmt::Display for EntryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pointer to a child sitemap listed in a sitemap index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapIndexRef {
    pub loc: String,
    #[serde(default)]
    pub lastmod: String,
}

/// Outcome of parsing an XML document: either an index or a plain sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParseResult {
    Index { refs: Vec<SitemapIndexRef> },
    Sitemap { entries: Vec<SitemapEntry> },
}

impl ParseResult {
    pub fn is_index(&self) -> bool {
        matches!(self, ParseResult::Index { .. })
    }
}

/// Output of CSV parsing: valid rows plus per-row problems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvParseResult {
    pub entries: Vec<SitemapEntry>,
    pub errors: Vec<String>,
}

/// A single metadata field that differs between two versions of a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: EntryField,
    pub from: String,
    pub to: String,
}

/// A URL present on both sides whose metadata changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedPair {
    pub url: String,
    pub changes: Vec<FieldChange>,
    pub old_entry: SitemapEntry,
    pub new_entry: SitemapEntry,
}

/// Set-algebra diff between two entry collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub added: Vec<SitemapEntry>,
    pub removed: Vec<SitemapEntry>,
    pub modified: Vec<ModifiedPair>,
    pub unchanged: Vec<SitemapEntry>,
}

impl DiffResult {
    /// True when nothing was added, removed, or modified.
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// A named collection of entries fed into the merger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntries {
    pub name: String,
    pub entries: Vec<SitemapEntry>,
}

impl NamedEntries {
    pub fn new(name: impl Into<String>, entries: Vec<SitemapEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }
}

/// Result of merging several entry collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub entries: Vec<SitemapEntry>,
    pub total_input: usize,
    pub unique_count: usize,
    pub duplicates_removed: usize,
    /// Originating set name for each entry in `entries`, index-aligned.
    #[serde(skip)]
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_value() {
        assert_eq!(SitemapEntry::new("u").with_priority("0.8").priority_value(), Some(0.8));
        assert_eq!(SitemapEntry::new("u").with_priority(" 1 ").priority_value(), Some(1.0));
        assert_eq!(SitemapEntry::new("u").priority_value(), None);
        assert_eq!(SitemapEntry::new("u").with_priority("high").priority_value(), None);
        assert_eq!(SitemapEntry::new("u").with_priority("NaN").priority_value(), None);
    }

    #[test]
    fn test_parse_result_tagged_serialization() {
        let result = ParseResult::Index {
            refs: vec![SitemapIndexRef {
                loc: "https://example.com/a.xml".to_string(),
                lastmod: String::new(),
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "index");
        assert_eq!(json["refs"][0]["loc"], "https://example.com/a.xml");
    }

    #[test]
    fn test_modified_pair_uses_camel_case() {
        let pair = ModifiedPair {
            url: "https://example.com/".to_string(),
            changes: vec![FieldChange {
                field: EntryField::Priority,
                from: "0.5".to_string(),
                to: "0.9".to_string(),
            }],
            old_entry: SitemapEntry::new("https://example.com/"),
            new_entry: SitemapEntry::new("https://example.com/"),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert!(json.get("oldEntry").is_some());
        assert_eq!(json["changes"][0]["field"], "priority");
    }

    #[test]
    fn test_entry_defaults_on_deserialize() {
        let entry: SitemapEntry = serde_json::from_str(r#"{"loc":"https://a.com/"}"#).unwrap();
        assert_eq!(entry.lastmod, "");
        assert_eq!(entry.changefreq, "");
        assert_eq!(entry.priority, "");
    }
}
