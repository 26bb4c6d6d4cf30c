//! Turn loose user input ("example.com") into sitemap URLs worth trying.

use url::Url;

/// URLs to try for one user input, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapCandidates {
    pub primary: String,
    pub fallbacks: Vec<String>,
    /// The input named a site rather than a file.
    pub was_bare_domain: bool,
}

impl SitemapCandidates {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.fallbacks.iter().map(String::as_str))
    }
}

/// Default to https, and expand a bare origin to its conventional sitemap paths.
pub fn candidates(input: &str) -> SitemapCandidates {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    let url = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.path(), "" | "/") => {
            let origin = parsed.origin().ascii_serialization();
            SitemapCandidates {
                primary: format!("{origin}/sitemap.xml"),
                fallbacks: vec![
                    format!("{origin}/sitemap_index.xml"),
                    format!("{origin}/sitemap/"),
                ],
                was_bare_domain: true,
            }
        }
        _ => SitemapCandidates {
            primary: url,
            fallbacks: Vec::new(),
            was_bare_domain: false,
        },
    }
}
