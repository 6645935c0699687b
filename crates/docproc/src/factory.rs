//! Factory for creating extractors.

use std::sync::Arc;

use crate::config::TextDecoding;
use crate::ocr::OcrEngine;
use crate::types::ExtractionCategory;
use crate::{Extractor, ImageExtractor, PdfExtractor, TextExtractor};

/// Factory for creating content extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a PDF extractor.
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create an image extractor with the default OCR engine.
    pub fn image() -> Arc<dyn Extractor> {
        Arc::new(ImageExtractor::new())
    }

    /// Create an image extractor with a custom OCR engine.
    pub fn image_with_engine(engine: Arc<dyn OcrEngine>) -> Arc<dyn Extractor> {
        Arc::new(ImageExtractor::with_engine(engine))
    }

    /// Create a lossy UTF-8 text extractor.
    pub fn text() -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::new())
    }

    /// Create a text extractor with the given invalid UTF-8 policy.
    pub fn text_with_decoding(decoding: TextDecoding) -> Arc<dyn Extractor> {
        Arc::new(TextExtractor::with_decoding(decoding))
    }

    /// Create the default extractor for a category.
    pub fn for_category(category: ExtractionCategory) -> Arc<dyn Extractor> {
        match category {
            ExtractionCategory::Pdf => Self::pdf(),
            ExtractionCategory::Image => Self::image(),
            ExtractionCategory::Text => Self::text(),
        }
    }

    /// Get one default extractor per category, in resolution order.
    pub fn all() -> Vec<Arc<dyn Extractor>> {
        ExtractionCategory::ALL
            .into_iter()
            .map(Self::for_category)
            .collect()
    }
}
