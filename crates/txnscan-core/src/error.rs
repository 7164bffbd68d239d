//! Error types for the txnscan-core library.

use thiserror::Error;

/// Main error type for the txnscan library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// The text is not a recognized statement.
    #[error("not a recognized statement: {0}")]
    Rejected(#[from] RejectionReason),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A pattern built from the statement template failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why the validator refused a document.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Nothing but whitespace was extracted.
    #[error("document contains no text")]
    EmptyDocument,

    /// Text was extracted but none of the statement markers occur in it.
    #[error("no statement markers found in document text")]
    MissingStatementMarkers,
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

    /// The PDF is encrypted and no password was supplied.
    #[error("PDF is password protected")]
    PasswordRequired,

    /// The supplied password did not decrypt the PDF.
    #[error("wrong password for PDF")]
    WrongPassword,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the txnscan library.
pub type Result<T> = std::result::Result<T, StatementError>;
