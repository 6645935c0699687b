//! Extraction error types.
//!
//! Display strings are safe to show to end users. The underlying library or
//! network cause is logged where the failure happens and is not carried here.

use thiserror::Error;

/// Errors that can occur while fetching or extracting a file.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File extension is not in any category of the supported-types table.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Fetching the file bytes from the hosting endpoint failed.
    #[error("Failed to download file")]
    DownloadFailed,

    /// The PDF could not be parsed.
    #[error("Failed to process PDF")]
    PdfProcessingFailed,

    /// The OCR engine could not recognize the image.
    #[error("Failed to process image")]
    OcrProcessingFailed,

    /// The text file could not be decoded.
    #[error("Failed to process text file")]
    TextProcessingFailed,

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ExtractError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE",
            Self::DownloadFailed => "DOWNLOAD_FAILED",
            Self::PdfProcessingFailed => "PDF_PROCESSING_FAILED",
            Self::OcrProcessingFailed => "OCR_PROCESSING_FAILED",
            Self::TextProcessingFailed => "TEXT_PROCESSING_FAILED",
            Self::Configuration(_) => "CONFIGURATION",
        }
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
