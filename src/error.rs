//! Error types for pdfscope.

use std::io;
use thiserror::Error;

/// Result type alias for pdfscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inspecting a page.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a document from disk.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes do not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The document could not be decoded.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is outside `[0, page_count)`.
    #[error("Page index {index} is out of range (valid range is 0..{page_count})")]
    PageOutOfRange {
        /// Requested 0-based index
        index: usize,
        /// Number of pages in the document
        page_count: usize,
    },

    /// The clip region contained no detectable table.
    #[error("No table found in the selected region")]
    NoTableFound,

    /// The clip region matched several tables and the selection policy
    /// requires exactly one.
    #[error("Selected region contains {count} tables; narrow the selection")]
    MultipleTables {
        /// Number of candidates returned for the clip
        count: usize,
    },

    /// The clip bounding box is unusable.
    #[error("Invalid clip region: {0}")]
    InvalidClip(String),

    /// The grid cannot be rendered as a markdown table.
    #[error("Table serialization error: {0}")]
    Serialization(String),

    /// Error while rendering results (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`], for callers that map failures to
/// transport-level responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document could not be opened or decoded.
    Parse,
    /// The requested page does not exist.
    PageRange,
    /// A clip extraction found no table.
    NoTableFound,
    /// The clip or selection request itself was unusable.
    InvalidRequest,
    /// A grid could not be serialized.
    Serialization,
    /// Anything else (rendering, runtime).
    Internal,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_)
            | Error::UnknownFormat
            | Error::UnsupportedVersion(_)
            | Error::Parse(_)
            | Error::Encrypted => ErrorKind::Parse,
            Error::PageOutOfRange { .. } => ErrorKind::PageRange,
            Error::NoTableFound => ErrorKind::NoTableFound,
            Error::MultipleTables { .. } | Error::InvalidClip(_) => ErrorKind::InvalidRequest,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Render(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Parse(err.to_string()),
        }
    }
}
