//! Image content extraction with OCR.
//!
//! Provides ImageExtractor, which runs an [`OcrEngine`] fixed to English on
//! a blocking task and returns the trimmed recognized text.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::ocr::{default_engine, OcrEngine, OCR_LANGUAGE};
use crate::types::{
    report_progress, CategoryMetadata, ExtractionCategory, ExtractionResult, ImageMetadata,
    ProgressCallback, ProgressStage,
};
use crate::Extractor;

/// Image extractor backed by an OCR engine.
///
/// Engine progress is logged and forwarded to the caller's callback; it has
/// no effect on the result. Only leading and trailing whitespace is trimmed.
pub struct ImageExtractor {
    engine: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    /// Create image extractor with the default engine for this build.
    pub fn new() -> Self {
        Self {
            engine: default_engine(),
        }
    }

    /// Create image extractor with a custom OCR engine.
    pub fn with_engine(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Name of the underlying OCR engine.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    async fn extract(
        &self,
        content: Vec<u8>,
        file_name: &str,
        progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult> {
        let engine = Arc::clone(&self.engine);
        let owned_name = file_name.to_string();
        let observer = progress;

        // Run the engine in a blocking task to avoid blocking the async runtime
        let recognized = tokio::task::spawn_blocking(move || {
            let forward = |stage: ProgressStage, fraction: f32| {
                report_progress(observer.as_ref(), &owned_name, stage, fraction);
            };
            engine.recognize(&content, OCR_LANGUAGE, &forward)
        })
        .await
        .map_err(|e| {
            tracing::error!(file_name, error = %e, "OCR task failed");
            ExtractError::OcrProcessingFailed
        })?;

        let text = recognized.map_err(|e| {
            tracing::error!(file_name, engine = self.engine.name(), error = %e, "OCR failed");
            ExtractError::OcrProcessingFailed
        })?;

        Ok(ExtractionResult::new(
            file_name,
            text.trim().to_string(),
            CategoryMetadata::Image(ImageMetadata::default()),
        ))
    }

    fn category(&self) -> ExtractionCategory {
        ExtractionCategory::Image
    }

    fn name(&self) -> &str {
        "image"
    }
}
