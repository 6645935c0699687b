//! docproc - Text extraction for chat-bot file uploads.
//!
//! Classifies an uploaded file by extension, downloads its bytes from the
//! file-hosting endpoint and runs exactly one extractor (PDF, OCR, or
//! UTF-8 text), returning a uniform [`ExtractionResult`].
//!
//! # Features
//!
//! - `pdf` (default) - PDF text extraction via pdf-extract, metadata via lopdf
//! - `ocr` (default) - Image OCR via tesseract (requires tesseract installed)
//!
//! # Example
//!
//! ```ignore
//! use docproc::{DocumentProcessor, ProcessorConfig};
//!
//! let processor = DocumentProcessor::from_config(ProcessorConfig::from_env()?)?;
//!
//! // Document upload with an explicit file name
//! let result = processor.process_file("documents/file_12.pdf", "report.pdf").await?;
//! println!("{} words", result.word_count());
//!
//! // Inline photo without a file name
//! let photo = processor.extract_telegram_image("photos/file_3.jpg").await?;
//! ```

mod classifier;
mod config;
mod error;
mod factory;
mod fetcher;
mod image;
mod pdf;
mod processor;
mod text;
mod types;
mod words;

pub mod ocr;

pub use classifier::{file_extension, SupportedTypes};
pub use config::{ProcessorConfig, TextDecoding, DEFAULT_API_BASE_URL};
pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use fetcher::{FileSource, TelegramFileSource};
pub use image::ImageExtractor;
pub use ocr::OcrEngine;
pub use pdf::PdfExtractor;
pub use processor::{DocumentProcessor, TELEGRAM_IMAGE_FILE_NAME, TELEGRAM_SOURCE};
pub use text::TextExtractor;
pub use types::{
    CategoryMetadata, ExtractionCategory, ExtractionResult, ImageMetadata, PdfMetadata,
    ProgressCallback, ProgressEvent, ProgressStage, ResultMetadata, TextMetadata,
};
pub use words::count_words;

use async_trait::async_trait;

/// Core Extractor trait - one implementation per extraction category.
///
/// The processor picks exactly one extractor per file by category.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text and metadata from the file's bytes.
    ///
    /// `progress`, when given, receives informational stage updates.
    async fn extract(
        &self,
        content: Vec<u8>,
        file_name: &str,
        progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult>;

    /// Category this extractor handles.
    fn category(&self) -> ExtractionCategory;

    /// Check if this extractor handles the given category.
    fn supports(&self, category: ExtractionCategory) -> bool {
        self.category() == category
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
