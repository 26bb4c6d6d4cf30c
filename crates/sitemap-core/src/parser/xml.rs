//! XML sitemap and sitemap index parsing.

use super::tree::{self, Element};
use crate::error::{ParseError, ParseOutcome};
use crate::model::{ParseResult, SitemapEntry, SitemapIndexRef};

/// Parse an XML sitemap or sitemap index.
///
/// Index detection wins: any `<sitemap>` directly under a `<sitemapindex>`
/// makes the whole document an index. Otherwise `<url>` elements under
/// `<urlset>` are read, falling back to every `<url>` in the document when
/// the root is missing or misnamed.
pub fn parse_xml(xml: &str) -> ParseOutcome<ParseResult> {
    let root = tree::build(xml)?;

    let mut index_nodes = Vec::new();
    root.children_of("sitemapindex", "sitemap", &mut index_nodes);
    if !index_nodes.is_empty() {
        let refs = index_nodes
            .into_iter()
            .map(|node| SitemapIndexRef {
                loc: text_of(node, "loc"),
                lastmod: text_of(node, "lastmod"),
            })
            .collect();
        return Ok(ParseResult::Index { refs });
    }

    let mut url_nodes = Vec::new();
    root.children_of("urlset", "url", &mut url_nodes);
    if url_nodes.is_empty() {
        tracing::debug!("no <url> under <urlset>, scanning whole document");
        root.elements_named("url", &mut url_nodes);
    }
    if url_nodes.is_empty() {
        return Err(ParseError::NoUrls);
    }

    let entries = url_nodes.into_iter().map(entry_from_node).collect();
    Ok(ParseResult::Sitemap { entries })
}

fn entry_from_node(node: &Element) -> SitemapEntry {
    SitemapEntry {
        loc: text_of(node, "loc"),
        lastmod: text_of(node, "lastmod"),
        changefreq: text_of(node, "changefreq"),
        priority: text_of(node, "priority"),
    }
}

/// Trimmed text of a sub-element: direct child first, then any descendant.
fn text_of(node: &Element, name: &str) -> String {
    node.child(name)
        .or_else(|| node.descendant(name))
        .map(|el| el.text().trim().to_string())
        .unwrap_or_default()
}
