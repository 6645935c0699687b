//! OCR engines.
//!
//! [`OcrEngine`] is the seam between the image extractor and the
//! recognizer. The default engine shells out to Tesseract through
//! rusty-tesseract.

use std::sync::Arc;

use crate::types::ProgressStage;

/// Language passed to the recognizer. Only English is supported.
pub const OCR_LANGUAGE: &str = "eng";

/// Error type returned by OCR engines. Logged, never shown to users.
pub type OcrError = Box<dyn std::error::Error + Send + Sync>;

/// Synchronous text recognizer, called from a blocking task.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded image (PNG, JPEG, ...).
    ///
    /// `progress` receives stage updates while recognition runs.
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &dyn Fn(ProgressStage, f32),
    ) -> Result<String, OcrError>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

/// Tesseract-backed engine.
///
/// The image is decoded and converted to grayscale first, so corrupt data
/// fails before Tesseract is spawned.
#[cfg(feature = "ocr")]
#[derive(Debug, Clone, Default)]
pub struct TesseractOcr {
    dpi: Option<i32>,
}

#[cfg(feature = "ocr")]
impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hint the source resolution to Tesseract.
    pub fn with_dpi(mut self, dpi: i32) -> Self {
        self.dpi = Some(dpi);
        self
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for TesseractOcr {
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &dyn Fn(ProgressStage, f32),
    ) -> Result<String, OcrError> {
        use rusty_tesseract::{Args, Image};

        progress(ProgressStage::LoadingImage, 0.0);
        let decoded = image::load_from_memory(image)?;
        let grayscale = image::DynamicImage::ImageLuma8(decoded.to_luma8());
        let tess_image = Image::from_dynamic_image(&grayscale)?;

        progress(ProgressStage::Recognizing, 0.5);
        let args = Args {
            lang: language.to_string(),
            dpi: self.dpi.or(Args::default().dpi),
            ..Args::default()
        };
        let text = rusty_tesseract::image_to_string(&tess_image, &args)?;

        progress(ProgressStage::Done, 1.0);
        Ok(text)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Engine used when OCR support is compiled out. Every call fails.
#[derive(Debug, Clone, Default)]
pub struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn recognize(
        &self,
        _image: &[u8],
        _language: &str,
        _progress: &dyn Fn(ProgressStage, f32),
    ) -> Result<String, OcrError> {
        Err("OCR support not enabled. Enable the 'ocr' feature.".into())
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Default engine for this build.
pub fn default_engine() -> Arc<dyn OcrEngine> {
    #[cfg(feature = "ocr")]
    {
        Arc::new(TesseractOcr::new())
    }
    #[cfg(not(feature = "ocr"))]
    {
        Arc::new(UnavailableOcr)
    }
}
