//! Export sitemap entries to CSV, JSON, sitemap XML, or a spreadsheet table.

use crate::model::SitemapEntry;
use quick_xml::escape::{escape, partial_escape};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// XML namespace of the sitemap 0.9 protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const COLUMN_HEADERS: [&str; 4] = ["URL", "Last Modified", "Change Frequency", "Priority"];

/// Output formats supported by [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
    Xls,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Xls => "xls",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Xml => "application/xml",
            ExportFormat::Xls => "application/vnd.ms-excel",
        }
    }
}

/// Render entries in the requested format.
pub fn export(entries: &[SitemapEntry], format: ExportFormat) -> String {
    match format {
        ExportFormat::Csv => to_csv(entries),
        ExportFormat::Json => to_json(entries),
        ExportFormat::Xml => to_xml(entries),
        ExportFormat::Xls => to_xls(entries),
    }
}

/// CSV with a header row. Formula-like cells are neutralized with a
/// leading apostrophe before quoting.
pub fn to_csv(entries: &[SitemapEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(
        COLUMN_HEADERS
            .iter()
            .map(|h| quote_csv(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for e in entries {
        let row = [&e.loc, &e.lastmod, &e.changefreq, &e.priority]
            .iter()
            .map(|value| quote_csv(&neutralize_formula(value)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    lines.join("\n")
}

fn neutralize_formula(value: &str) -> String {
    if value.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        format!("'{value}")
    } else {
        value.to_string()
    }
}

fn quote_csv(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRecord<'a> {
    url: &'a str,
    last_modified: Option<&'a str>,
    change_frequency: Option<&'a str>,
    priority: Option<f64>,
}

/// Pretty-printed JSON array; empty fields become `null`.
pub fn to_json(entries: &[SitemapEntry]) -> String {
    let records: Vec<JsonRecord<'_>> = entries
        .iter()
        .map(|e| JsonRecord {
            url: &e.loc,
            last_modified: non_empty(&e.lastmod),
            change_frequency: non_empty(&e.changefreq),
            priority: e.priority_value(),
        })
        .collect();

    // Serializing plain strings and finite floats cannot fail.
    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Sitemap 0.9 XML. Empty optional fields are omitted.
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NAMESPACE}\">");

    for e in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape(e.loc.as_str()));
        for (tag, value) in [
            ("lastmod", &e.lastmod),
            ("changefreq", &e.changefreq),
            ("priority", &e.priority),
        ] {
            if !value.is_empty() {
                let _ = writeln!(xml, "    <{tag}>{}</{tag}>", escape(value.as_str()));
            }
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// An HTML table that spreadsheet applications open as a worksheet.
pub fn to_xls(entries: &[SitemapEntry]) -> String {
    let mut html = String::from("<html><head><meta charset=\"UTF-8\"></head><body>");
    html.push_str("<table border=\"1\">");
    html.push_str("<tr>");
    for header in COLUMN_HEADERS {
        let _ = write!(html, "<th>{header}</th>");
    }
    html.push_str("</tr>");

    for e in entries {
        html.push_str("<tr>");
        for value in [&e.loc, &e.lastmod, &e.changefreq, &e.priority] {
            let _ = write!(html, "<td>{}</td>", partial_escape(value.as_str()));
        }
        html.push_str("</tr>");
    }

    html.push_str("</table></body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParseResult;
    use crate::parser::parse_xml;

    fn sample() -> Vec<SitemapEntry> {
        vec![
            SitemapEntry::new("https://example.com/")
                .with_lastmod("2024-01-01")
                .with_changefreq("daily")
                .with_priority("1.0"),
            SitemapEntry::new("https://example.com/search?q=a&b=<c>"),
        ]
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&sample());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "URL,Last Modified,Change Frequency,Priority");
        assert_eq!(lines[1], "https://example.com/,2024-01-01,daily,1.0");
        assert_eq!(lines[2], "https://example.com/search?q=a&b=<c>,,,");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_neutralizes_formulas() {
        let entries = vec![SitemapEntry::new("=HYPERLINK(\"x\")").with_priority("-1")];
        let csv = to_csv(&entries);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "\"'=HYPERLINK(\"\"x\"\")\",,,'-1");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let entries = vec![SitemapEntry::new("https://example.com/a,b")];
        assert!(to_csv(&entries).ends_with("\"https://example.com/a,b\",,,"));
    }

    #[test]
    fn test_json_nulls_and_numbers() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample())).unwrap();
        assert_eq!(json[0]["url"], "https://example.com/");
        assert_eq!(json[0]["lastModified"], "2024-01-01");
        assert_eq!(json[0]["priority"], 1.0);
        assert!(json[1]["lastModified"].is_null());
        assert!(json[1]["changeFrequency"].is_null());
        assert!(json[1]["priority"].is_null());
    }

    #[test]
    fn test_xml_omits_empty_fields_and_escapes() {
        let xml = to_xml(&sample());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns="));
        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b=&lt;c&gt;</loc>"));
        assert_eq!(xml.matches("<lastmod>").count(), 1);
        assert!(xml.ends_with("</urlset>"));
    }

    #[test]
    fn test_xml_round_trip() {
        let entries = sample();
        match parse_xml(&to_xml(&entries)).unwrap() {
            ParseResult::Sitemap { entries: parsed } => assert_eq!(parsed, entries),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_xls_table() {
        let html = to_xls(&sample());
        assert!(html.contains("<th>Change Frequency</th>"));
        assert!(html.contains("<td>https://example.com/search?q=a&amp;b=&lt;c&gt;</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Xls.extension(), "xls");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert_eq!(export(&[], ExportFormat::Json), "[]");
    }
}
