//! Error types for the cardstmt-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the cardstmt library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Category rule store error.
    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    /// A transaction grammar failed to compile.
    #[error("grammar error: {0}")]
    Grammar(#[from] regex::Error),

    /// The interactive resolver failed to produce an answer.
    #[error("resolver error: {0}")]
    Resolver(String),

    /// Input data had an unexpected shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to the persisted category rule store.
#[derive(Error, Debug)]
pub enum RulesError {
    /// The store exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The store is not a JSON object of strings.
    #[error("malformed rule store {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The store could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for the cardstmt library.
pub type Result<T> = std::result::Result<T, StatementError>;
