//! Core types for content extraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::words::count_words;

/// Extraction category, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionCategory {
    /// PDF document.
    Pdf,
    /// Raster image, read with OCR.
    Image,
    /// Plain text.
    Text,
}

impl ExtractionCategory {
    /// All categories in dispatch resolution order.
    pub const ALL: [ExtractionCategory; 3] = [Self::Pdf, Self::Image, Self::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ExtractionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PDF-specific metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfMetadata {
    /// Page count reported by the parser.
    pub pages: usize,
    /// Document-info dictionary (Title, Author, ...). Empty when absent.
    #[serde(default)]
    pub info: BTreeMap<String, String>,
}

/// Image-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Always `"processed"`; the engine's own confidence is not surfaced.
    pub ocr_confidence: String,
    /// Upload channel tag, set for inline chat images.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
}

impl Default for ImageMetadata {
    fn default() -> Self {
        Self {
            ocr_confidence: "processed".to_string(),
            source: None,
        }
    }
}

/// Text-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMetadata {
    pub encoding: String,
}

impl Default for TextMetadata {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
        }
    }
}

/// Per-category metadata record.
///
/// Serialized untagged so its fields sit next to `wordCount` and
/// `extractedAt` in the `metadata` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryMetadata {
    Pdf(PdfMetadata),
    Image(ImageMetadata),
    Text(TextMetadata),
}

impl CategoryMetadata {
    /// Category this record belongs to.
    pub fn category(&self) -> ExtractionCategory {
        match self {
            Self::Pdf(_) => ExtractionCategory::Pdf,
            Self::Image(_) => ExtractionCategory::Image,
            Self::Text(_) => ExtractionCategory::Text,
        }
    }
}

/// Metadata shared by every result plus the category record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub word_count: usize,
    #[serde(with = "iso8601_millis")]
    pub extracted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: CategoryMetadata,
}

/// Uniform output of every extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(rename = "type")]
    pub category: ExtractionCategory,
    pub file_name: String,
    pub text: String,
    pub metadata: ResultMetadata,
}

impl ExtractionResult {
    /// Build a result stamped with the current time and the word count of `text`.
    pub fn new(file_name: impl Into<String>, text: String, details: CategoryMetadata) -> Self {
        let word_count = count_words(text.as_str());
        Self {
            category: details.category(),
            file_name: file_name.into(),
            text,
            metadata: ResultMetadata {
                word_count,
                extracted_at: Utc::now(),
                details,
            },
        }
    }

    pub fn word_count(&self) -> usize {
        self.metadata.word_count
    }

    /// PDF metadata, if this is a PDF result.
    pub fn pdf(&self) -> Option<&PdfMetadata> {
        match &self.metadata.details {
            CategoryMetadata::Pdf(m) => Some(m),
            _ => None,
        }
    }

    /// Image metadata, if this is an image result.
    pub fn image(&self) -> Option<&ImageMetadata> {
        match &self.metadata.details {
            CategoryMetadata::Image(m) => Some(m),
            _ => None,
        }
    }

    /// Text metadata, if this is a text result.
    pub fn text_meta(&self) -> Option<&TextMetadata> {
        match &self.metadata.details {
            CategoryMetadata::Text(m) => Some(m),
            _ => None,
        }
    }
}

/// Stage reported through a [`ProgressCallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    LoadingImage,
    Recognizing,
    ParsingDocument,
    ExtractingText,
    Decoding,
    Done,
}

/// A single progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    /// Fraction complete, 0.0 to 1.0.
    pub progress: f32,
}

/// Observer for extraction progress. Purely informational.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Log a progress event and forward it to the observer, if any.
pub(crate) fn report_progress(
    progress: Option<&ProgressCallback>,
    file_name: &str,
    stage: ProgressStage,
    fraction: f32,
) {
    tracing::debug!(file_name, ?stage, progress = fraction, "extraction progress");
    if let Some(callback) = progress {
        callback(ProgressEvent {
            stage,
            progress: fraction,
        });
    }
}

/// `extractedAt` as ISO-8601 UTC with millisecond precision.
mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
