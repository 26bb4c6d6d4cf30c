//! Turning raw sitemap text (XML or CSV) into canonical records.

mod csv;
mod tree;
mod xml;

pub use self::csv::parse_csv;
pub use self::xml::parse_xml;

/// Whether a response body is an HTML page rather than a sitemap.
///
/// Checks for a leading doctype or `<html` tag after leading whitespace,
/// ignoring case. Both the fetch proxy and the loader gate on this.
pub fn looks_like_html(text: &str) -> bool {
    let head = text.trim_start();
    starts_with_ignore_case(head, "<!doctype") || starts_with_ignore_case(head, "<html")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html></html>"));
        assert!(looks_like_html("\n  <html lang=\"en\">"));
        assert!(looks_like_html("<HTML>"));
        assert!(looks_like_html("<!doctype html>"));
        assert!(!looks_like_html("<?xml version=\"1.0\"?><urlset/>"));
        assert!(!looks_like_html("<urlset/>"));
        assert!(!looks_like_html(""));
        assert!(!looks_like_html("<ht"));
    }

    #[test]
    fn test_multibyte_prefix_does_not_panic() {
        assert!(!looks_like_html("ééééééééé"));
    }
}
