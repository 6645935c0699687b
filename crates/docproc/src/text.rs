//! Plain-text extraction.

use async_trait::async_trait;

use crate::config::TextDecoding;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{
    report_progress, CategoryMetadata, ExtractionCategory, ExtractionResult, ProgressCallback,
    ProgressStage, TextMetadata,
};
use crate::Extractor;

/// Decodes file bytes as UTF-8.
///
/// No line-ending normalization and no BOM stripping. Invalid sequences are
/// replaced or rejected according to [`TextDecoding`].
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    decoding: TextDecoding,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decoding(decoding: TextDecoding) -> Self {
        Self { decoding }
    }

    fn decode(&self, content: Vec<u8>, file_name: &str) -> ExtractResult<String> {
        match self.decoding {
            TextDecoding::Lossy => Ok(match String::from_utf8(content) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(file_name, "invalid UTF-8 replaced");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            }),
            TextDecoding::Strict => String::from_utf8(content).map_err(|e| {
                tracing::error!(file_name, error = %e.utf8_error(), "text decoding failed");
                ExtractError::TextProcessingFailed
            }),
        }
    }
}

#[async_trait]
impl Extractor for TextExtractor {
    async fn extract(
        &self,
        content: Vec<u8>,
        file_name: &str,
        progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult> {
        report_progress(progress.as_ref(), file_name, ProgressStage::Decoding, 0.0);
        let text = self.decode(content, file_name)?;
        report_progress(progress.as_ref(), file_name, ProgressStage::Done, 1.0);

        Ok(ExtractionResult::new(
            file_name,
            text,
            CategoryMetadata::Text(TextMetadata::default()),
        ))
    }

    fn category(&self) -> ExtractionCategory {
        ExtractionCategory::Text
    }

    fn name(&self) -> &str {
        "utf8-text"
    }
}
