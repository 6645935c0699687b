//! PDF content extraction using pdf-extract and lopdf.

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{ExtractionCategory, ExtractionResult, ProgressCallback};
use crate::Extractor;

#[cfg(feature = "pdf")]
use crate::types::{report_progress, CategoryMetadata, PdfMetadata, ProgressStage};

/// Separator placed between the text of consecutive pages.
#[cfg(feature = "pdf")]
const PAGE_SEPARATOR: &str = "\n\n";

/// PDF content extractor.
///
/// Page count and the document-info dictionary come from lopdf, the text
/// from pdf-extract. Both are synchronous and run inside spawn_blocking.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "pdf")]
mod parse {
    use super::*;
    use lopdf::{Dictionary, Document, Object};
    use std::collections::BTreeMap;

    /// Parse page count, info dictionary and text.
    pub(super) fn parse(
        content: &[u8],
        progress: &dyn Fn(ProgressStage, f32),
    ) -> Result<(usize, BTreeMap<String, String>, String), String> {
        let doc = Document::load_mem(content).map_err(|e| format!("load failed: {}", e))?;
        if doc.is_encrypted() {
            return Err("document is encrypted".to_string());
        }

        let pages = doc.get_pages().len();
        let info = info_dictionary(&doc);

        progress(ProgressStage::ExtractingText, 0.5);
        let text = pdf_extract::extract_text_from_mem_by_pages(content)
            .map_err(|e| format!("text extraction failed: {}", e))?
            .join(PAGE_SEPARATOR);

        Ok((pages, info, text))
    }

    /// Trailer `/Info` entries as strings. Missing or malformed gives an empty map.
    fn info_dictionary(doc: &Document) -> BTreeMap<String, String> {
        let dict: Option<&Dictionary> = match doc.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => doc.get_object(*id).ok().and_then(|o| o.as_dict().ok()),
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        };

        let mut info = BTreeMap::new();
        if let Some(dict) = dict {
            for (key, value) in dict.iter() {
                if let Some(value) = object_to_string(value) {
                    info.insert(String::from_utf8_lossy(key).into_owned(), value);
                }
            }
        }
        info
    }

    fn object_to_string(value: &Object) -> Option<String> {
        match value {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            Object::Integer(i) => Some(i.to_string()),
            Object::Real(r) => Some(r.to_string()),
            Object::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// PDF text string: UTF-16BE with a BOM, otherwise single-byte.
    pub(super) fn decode_text_string(bytes: &[u8]) -> String {
        if let Some(utf16) = bytes.strip_prefix(b"\xFE\xFF") {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            return char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect();
        }
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    #[cfg(feature = "pdf")]
    async fn extract(
        &self,
        content: Vec<u8>,
        file_name: &str,
        progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult> {
        report_progress(progress.as_ref(), file_name, ProgressStage::ParsingDocument, 0.0);

        let owned_name = file_name.to_string();
        let observer = progress.clone();
        let parsed = tokio::task::spawn_blocking(move || {
            let forward = |stage: ProgressStage, fraction: f32| {
                report_progress(observer.as_ref(), &owned_name, stage, fraction);
            };
            parse::parse(&content, &forward)
        })
        .await
        .map_err(|e| {
            tracing::error!(file_name, error = %e, "PDF parser task failed");
            ExtractError::PdfProcessingFailed
        })?;

        let (pages, info, text) = parsed.map_err(|e| {
            tracing::error!(file_name, error = %e, "PDF parsing failed");
            ExtractError::PdfProcessingFailed
        })?;

        report_progress(progress.as_ref(), file_name, ProgressStage::Done, 1.0);

        Ok(ExtractionResult::new(
            file_name,
            text,
            CategoryMetadata::Pdf(PdfMetadata { pages, info }),
        ))
    }

    #[cfg(not(feature = "pdf"))]
    async fn extract(
        &self,
        _content: Vec<u8>,
        file_name: &str,
        _progress: Option<ProgressCallback>,
    ) -> ExtractResult<ExtractionResult> {
        tracing::error!(file_name, "PDF support not enabled. Enable the 'pdf' feature.");
        Err(ExtractError::PdfProcessingFailed)
    }

    fn category(&self) -> ExtractionCategory {
        ExtractionCategory::Pdf
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}
