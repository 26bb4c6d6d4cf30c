//! Response body handling: size caps, content decoding, and sanity checks.

use super::error::FetchError;
use flate2::read::{MultiGzDecoder, ZlibDecoder};
use sitemap_core::looks_like_html;
use std::io::Read;

/// Compression named by a `Content-Encoding` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
}

impl ContentEncoding {
    /// Unknown encodings are treated as identity.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("gzip") | Some("x-gzip") => ContentEncoding::Gzip,
            Some("deflate") => ContentEncoding::Deflate,
            Some("br") => ContentEncoding::Brotli,
            _ => ContentEncoding::Identity,
        }
    }
}

/// Reject a response whose declared length already exceeds `limit`.
pub fn check_declared_length(declared: Option<u64>, limit: u64) -> Result<(), FetchError> {
    match declared {
        Some(len) if len > limit => Err(FetchError::TooLarge { limit }),
        _ => Ok(()),
    }
}

/// Byte accumulator that refuses to grow past its limit.
#[derive(Debug)]
pub struct CappedBuffer {
    bytes: Vec<u8>,
    limit: u64,
}

impl CappedBuffer {
    pub fn new(limit: u64) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<(), FetchError> {
        if (self.bytes.len() + chunk.len()) as u64 > self.limit {
            return Err(FetchError::TooLarge { limit: self.limit });
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

/// Decompress `raw` and decode it as (lossy) UTF-8, capping the decoded size.
pub fn decode(raw: Vec<u8>, encoding: ContentEncoding, limit: u64) -> Result<String, FetchError> {
    let bytes = match encoding {
        ContentEncoding::Identity => raw,
        ContentEncoding::Gzip => read_capped(MultiGzDecoder::new(raw.as_slice()), limit)?,
        ContentEncoding::Deflate => read_capped(ZlibDecoder::new(raw.as_slice()), limit)?,
        ContentEncoding::Brotli => {
            read_capped(brotli::Decompressor::new(raw.as_slice(), 4096), limit)?
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_capped<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|e| FetchError::Decompression(e.to_string()))?;
    if out.len() as u64 > limit {
        return Err(FetchError::TooLarge { limit });
    }
    Ok(out)
}

/// Make sure the decoded body looks like an XML document.
pub fn validate_body(text: &str) -> Result<(), FetchError> {
    if looks_like_html(text) {
        return Err(FetchError::HtmlResponse);
    }
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Err(FetchError::EmptyResponse);
    }
    if !trimmed.starts_with('<') {
        return Err(FetchError::NotXml);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    const XML: &str = "<urlset><url><loc>https://example.com/</loc></url></urlset>";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_encoding_header() {
        assert_eq!(ContentEncoding::from_header(Some("GZIP")), ContentEncoding::Gzip);
        assert_eq!(ContentEncoding::from_header(Some(" br ")), ContentEncoding::Brotli);
        assert_eq!(ContentEncoding::from_header(Some("deflate")), ContentEncoding::Deflate);
        assert_eq!(ContentEncoding::from_header(Some("zstd")), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::from_header(None), ContentEncoding::Identity);
    }

    #[test]
    fn test_decode_gzip_and_deflate() {
        let limit = 1024;
        assert_eq!(decode(gzip(XML.as_bytes()), ContentEncoding::Gzip, limit).unwrap(), XML);
        assert_eq!(decode(zlib(XML.as_bytes()), ContentEncoding::Deflate, limit).unwrap(), XML);
        assert_eq!(decode(XML.as_bytes().to_vec(), ContentEncoding::Identity, limit).unwrap(), XML);
    }

    #[test]
    fn test_decode_brotli() {
        let mut compressed = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 5, 22);
            writer.write_all(XML.as_bytes()).unwrap();
        }
        assert_eq!(decode(compressed, ContentEncoding::Brotli, 1024).unwrap(), XML);
    }

    #[test]
    fn test_decompressed_size_is_capped() {
        let big = vec![b'a'; 10_000];
        let err = decode(gzip(&big), ContentEncoding::Gzip, 1_000).unwrap_err();
        assert_eq!(err, FetchError::TooLarge { limit: 1_000 });
    }

    #[test]
    fn test_corrupt_stream() {
        let err = decode(b"definitely not gzip".to_vec(), ContentEncoding::Gzip, 1024).unwrap_err();
        assert_eq!(err.kind(), "decompression-error");
    }

    #[test]
    fn test_lossy_utf8() {
        let text = decode(vec![b'<', 0xff, b'>'], ContentEncoding::Identity, 16).unwrap();
        assert_eq!(text, "<\u{fffd}>");
    }

    #[test]
    fn test_capped_buffer() {
        let mut buf = CappedBuffer::new(8);
        buf.push(b"1234").unwrap();
        buf.push(b"5678").unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.push(b"9"), Err(FetchError::TooLarge { limit: 8 }));
        assert_eq!(buf.into_inner(), b"12345678");
    }

    #[test]
    fn test_declared_length() {
        assert!(check_declared_length(None, 10).is_ok());
        assert!(check_declared_length(Some(10), 10).is_ok());
        assert_eq!(
            check_declared_length(Some(11), 10),
            Err(FetchError::TooLarge { limit: 10 })
        );
    }

    #[test]
    fn test_validate_body() {
        assert_eq!(validate_body("<!DOCTYPE html><html></html>"), Err(FetchError::HtmlResponse));
        assert_eq!(validate_body("  \n<HTML>"), Err(FetchError::HtmlResponse));
        assert_eq!(validate_body("   \n\t"), Err(FetchError::EmptyResponse));
        assert_eq!(validate_body(""), Err(FetchError::EmptyResponse));
        assert_eq!(validate_body("{\"json\": true}"), Err(FetchError::NotXml));
        assert!(validate_body("\n<?xml version=\"1.0\"?><urlset/>").is_ok());
        assert!(validate_body("<anything/>").is_ok());
    }
}
