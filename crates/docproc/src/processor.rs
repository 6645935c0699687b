//! Top-level dispatcher: classify, download, extract.

use std::sync::Arc;

use crate::classifier::{file_extension, SupportedTypes};
use crate::config::ProcessorConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::factory::ExtractorFactory;
use crate::fetcher::{FileSource, TelegramFileSource};
use crate::types::{CategoryMetadata, ExtractionCategory, ExtractionResult, ProgressCallback};
use crate::Extractor;

/// File name given to inline chat images, which arrive without one.
pub const TELEGRAM_IMAGE_FILE_NAME: &str = "telegram_image.jpg";

/// `source` tag added to inline chat image results.
pub const TELEGRAM_SOURCE: &str = "telegram";

/// Routes each file to exactly one extractor.
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent calls. Files are classified before they are downloaded: an
/// unsupported extension fails without a network call.
pub struct DocumentProcessor {
    supported_types: SupportedTypes,
    source: Arc<dyn FileSource>,
    extractors: Vec<Arc<dyn Extractor>>,
}

impl DocumentProcessor {
    /// Create a processor with the default extractors.
    pub fn new(supported_types: SupportedTypes, source: Arc<dyn FileSource>) -> Self {
        Self {
            supported_types,
            source,
            extractors: ExtractorFactory::all(),
        }
    }

    /// Build the Telegram source and default extractors from configuration.
    pub fn from_config(config: ProcessorConfig) -> ExtractResult<Self> {
        config.validate()?;
        let source = Arc::new(TelegramFileSource::from_config(&config));
        let text_decoding = config.text_decoding;

        Ok(Self::new(config.supported_types, source)
            .with_extractor(ExtractorFactory::text_with_decoding(text_decoding)))
    }

    /// Replace the extractor registered for the same category.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        let category = extractor.category();
        self.extractors.retain(|e| !e.supports(category));
        self.extractors.push(extractor);
        self
    }

    /// Read-only view of the extension table.
    pub fn supported_types(&self) -> &SupportedTypes {
        &self.supported_types
    }

    /// Whether the file's extension is recognized.
    pub fn is_supported(&self, file_name: &str) -> bool {
        self.supported_types.is_supported(file_name)
    }

    fn extractor_for(&self, category: ExtractionCategory, file_name: &str) -> ExtractResult<&Arc<dyn Extractor>> {
        self.extractors
            .iter()
            .find(|e| e.supports(category))
            .ok_or_else(|| {
                tracing::error!(%category, file_name, "no extractor registered for category");
                ExtractError::UnsupportedFileType(file_extension(file_name))
            })
    }

    /// Download `remote_path` and extract it according to `file_name`'s extension.
    pub async fn process_file(&self, remote_path: &str, file_name: &str) -> ExtractResult<ExtractionResult> {
        self.process_file_with_progress(remote_path, file_name, None).await
    }

    /// [`process_file`](Self::process_file) with a progress observer.
    pub async fn process_file_with_progress(
        &self,
        remote_path: &str,
        file_name: &str,
        progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult> {
        let outcome = async {
            let category = self.supported_types.classify(file_name)?;
            let extractor = self.extractor_for(category, file_name)?;
            tracing::debug!(remote_path, file_name, %category, extractor = extractor.name(), "routing file");

            let content = self.source.download(remote_path).await?;
            extractor.extract(content, file_name, progress).await
        }
        .await;

        log_outcome(remote_path, file_name, &outcome);
        outcome
    }

    /// Classify and extract bytes that are already in memory.
    pub async fn process_bytes(&self, content: Vec<u8>, file_name: &str) -> ExtractResult<ExtractionResult> {
        let outcome = async {
            let category = self.supported_types.classify(file_name)?;
            self.extractor_for(category, file_name)?
                .extract(content, file_name, None)
                .await
        }
        .await;

        log_outcome("<local>", file_name, &outcome);
        outcome
    }

    /// Download an inline chat image and run OCR on it.
    ///
    /// Skips classification, uses [`TELEGRAM_IMAGE_FILE_NAME`] as the file
    /// name and tags the result with `source: "telegram"`.
    pub async fn extract_telegram_image(&self, remote_path: &str) -> ExtractResult<ExtractionResult> {
        self.extract_telegram_image_with_progress(remote_path, None).await
    }

    /// [`extract_telegram_image`](Self::extract_telegram_image) with a progress observer.
    pub async fn extract_telegram_image_with_progress(
        &self,
        remote_path: &str,
        progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult> {
        let file_name = TELEGRAM_IMAGE_FILE_NAME;
        let outcome = async {
            let extractor = self.extractor_for(ExtractionCategory::Image, file_name)?;
            let content = self.source.download(remote_path).await?;
            let mut result = extractor.extract(content, file_name, progress).await?;

            if let CategoryMetadata::Image(meta) = &mut result.metadata.details {
                meta.source = Some(TELEGRAM_SOURCE.to_string());
            }
            Ok::<_, ExtractError>(result)
        }
        .await;

        log_outcome(remote_path, file_name, &outcome);
        outcome
    }
}

fn log_outcome(remote_path: &str, file_name: &str, outcome: &ExtractResult<ExtractionResult>) {
    match outcome {
        Ok(result) => tracing::info!(
            remote_path,
            file_name,
            category = %result.category,
            word_count = result.word_count(),
            "file processed"
        ),
        Err(e) => tracing::warn!(
            remote_path,
            file_name,
            code = e.code(),
            error = %e,
            "file processing failed"
        ),
    }
}
