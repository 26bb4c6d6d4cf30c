//! Error types for sitemap parsing.

/// Result alias for parser operations.
pub type ParseOutcome<T> = Result<T, ParseError>;

/// Structural failures while turning text into sitemap records.
///
/// Per-row CSV problems are not errors; they are collected in
/// [`CsvParseResult::errors`](crate::model::CsvParseResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid XML format: {0}")]
    InvalidXml(String),

    #[error("No URLs found in sitemap")]
    NoUrls,

    #[error("CSV must have a header row and at least one data row")]
    CsvTooShort,
}

impl ParseError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::InvalidXml(_) => "invalid-xml",
            ParseError::NoUrls => "no-urls",
            ParseError::CsvTooShort => "csv-too-short",
        }
    }
}
