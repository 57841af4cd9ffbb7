//! PDF header detection.
//!
//! Cheap sniffing of the `%PDF-x.y` marker so callers get
//! [`Error::UnknownFormat`] before the parser is invoked.

use std::sync::OnceLock;

use regex::bytes::Regex;

use crate::error::{Error, Result};

/// How far into the file the header may start; producers sometimes
/// prepend junk before `%PDF-`.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// PDF magic bytes.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Parsed PDF header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of `%PDF-` in the file
    pub offset: usize,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Detect the PDF header from the leading bytes of a file.
///
/// Returns [`Error::UnknownFormat`] when no `%PDF-` marker appears in the
/// first kilobyte, and [`Error::UnsupportedVersion`] when the marker is
/// followed by something other than `digit.digit`.
pub fn detect_header(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let rest = &window[offset + PDF_MAGIC.len()..];
    match version_pattern().and_then(|re| re.captures(rest)) {
        Some(caps) => Ok(PdfHeader {
            version: String::from_utf8_lossy(&caps[1]).to_string(),
            offset,
        }),
        None => {
            let found: String = String::from_utf8_lossy(&rest[..rest.len().min(8)])
                .chars()
                .take_while(|c| !c.is_whitespace())
                .collect();
            Err(Error::UnsupportedVersion(found))
        }
    }
}

/// Check if bytes start like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_header(data).is_ok()
}

fn version_pattern() -> Option<&'static Regex> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    VERSION
        .get_or_init(|| Regex::new(r"^(\d\.\d)(?:\s|%|$)").ok())
        .as_ref()
}
