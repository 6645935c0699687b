//! Extension-based classification of incoming files.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};
use crate::types::ExtractionCategory;

/// Lowercased extension of `file_name` with a leading dot.
///
/// Takes the substring after the last `.`. Returns an empty string when
/// there is no dot or nothing follows it.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    }
}

/// Recognized file extensions per extraction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportedTypes {
    pub pdf: Vec<String>,
    pub image: Vec<String>,
    pub text: Vec<String>,
}

impl Default for SupportedTypes {
    fn default() -> Self {
        fn list(exts: &[&str]) -> Vec<String> {
            exts.iter().map(|e| e.to_string()).collect()
        }

        Self {
            pdf: list(&[".pdf"]),
            image: list(&[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff", ".tif"]),
            text: list(&[".txt", ".md", ".csv", ".log"]),
        }
    }
}

impl SupportedTypes {
    /// Normalize every entry to lowercase with a leading dot.
    ///
    /// Applied to tables read from configuration files.
    pub fn normalized(self) -> Self {
        fn normalize(exts: Vec<String>) -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(exts.len());
            for ext in exts {
                let ext = ext.trim().trim_start_matches('.').to_lowercase();
                if ext.is_empty() {
                    continue;
                }
                let ext = format!(".{}", ext);
                if !out.contains(&ext) {
                    out.push(ext);
                }
            }
            out
        }

        Self {
            pdf: normalize(self.pdf),
            image: normalize(self.image),
            text: normalize(self.text),
        }
    }

    /// Extensions registered for a category.
    pub fn extensions(&self, category: ExtractionCategory) -> &[String] {
        match category {
            ExtractionCategory::Pdf => &self.pdf,
            ExtractionCategory::Image => &self.image,
            ExtractionCategory::Text => &self.text,
        }
    }

    /// Category for an already-normalized extension, checked pdf, image, text.
    pub fn category_for_extension(&self, extension: &str) -> Option<ExtractionCategory> {
        ExtractionCategory::ALL
            .into_iter()
            .find(|category| self.extensions(*category).iter().any(|e| e == extension))
    }

    /// Route a file name to its category.
    pub fn classify(&self, file_name: &str) -> ExtractResult<ExtractionCategory> {
        let extension = file_extension(file_name);
        self.category_for_extension(&extension)
            .ok_or(ExtractError::UnsupportedFileType(extension))
    }

    /// Whether any category recognizes the file's extension.
    pub fn is_supported(&self, file_name: &str) -> bool {
        self.category_for_extension(&file_extension(file_name))
            .is_some()
    }

    /// First extension registered under more than one category, if any.
    pub fn find_overlap(&self) -> Option<&str> {
        let all = [&self.pdf, &self.image, &self.text];
        for (i, exts) in all.iter().enumerate() {
            for ext in exts.iter() {
                if all[i + 1..].iter().any(|other| other.contains(ext)) {
                    return Some(ext.as_str());
                }
            }
        }
        None
    }
}
