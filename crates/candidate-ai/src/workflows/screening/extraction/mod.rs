//! Document text extraction with a two-strategy fallback.
//!
//! The native text layer is attempted first for every page. When the
//! whole document yields fewer than [`NATIVE_TEXT_THRESHOLD`] characters,
//! the partial result is discarded and every page is reprocessed through
//! optical recognition: the page's embedded raster is pulled out, upscaled
//! 2x, and sent to the oracle's vision interface. The threshold is
//! evaluated once over the full document, not per page, so a single
//! image-only page inside a text-rich document is not individually
//! re-recognized.

mod native;
pub mod ocr;
mod raster;

pub use ocr::{OcrEngine, OracleVisionOcr};

use serde::Serialize;

/// Whole-document character count below which the native text layer is
/// considered unusable.
pub const NATIVE_TEXT_THRESHOLD: usize = 150;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("document parsing failed: {0}")]
    PdfParsing(String),
    #[error("image processing failed: {0}")]
    ImageProcessing(String),
    #[error("optical recognition failed: {0}")]
    Recognition(String),
}

/// Which strategy produced the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceStrategy {
    NativeLayer,
    OpticalRecognition,
}

/// Extracted document text. Ephemeral: callers persist derived fields,
/// never this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    pub content: String,
    pub strategy: SourceStrategy,
    pub page_count: usize,
}

/// Orchestrates the native-first, recognition-fallback extraction.
pub struct DocumentExtractor<E> {
    ocr: E,
}

impl<E: OcrEngine> DocumentExtractor<E> {
    pub fn new(ocr: E) -> Self {
        Self { ocr }
    }

    pub async fn extract(&self, document: &[u8]) -> Result<ExtractedText, ExtractionError> {
        match native::extract_pages(document) {
            Ok(pages) => {
                let glyphs: usize = pages.iter().map(|page| page.trim().chars().count()).sum();
                if !needs_recognition(glyphs) {
                    return Ok(ExtractedText {
                        content: join_pages(&pages),
                        strategy: SourceStrategy::NativeLayer,
                        page_count: pages.len(),
                    });
                }

                tracing::info!(
                    glyphs,
                    pages = pages.len(),
                    "native text layer below threshold, reprocessing via optical recognition"
                );
                self.recognize_document(document, pages.len()).await
            }
            Err(err) => {
                // No usable text layer at all. The raster path gets one
                // chance before the document is declared unreadable.
                tracing::warn!(error = %err, "native text layer unreadable, attempting optical recognition");
                let page_count = raster::page_count(document)?;
                self.recognize_document(document, page_count).await
            }
        }
    }

    /// Recognize every page in order. Pages are processed sequentially:
    /// recognition is resource-heavy per page, and order must be stable.
    async fn recognize_document(
        &self,
        document: &[u8],
        page_count: usize,
    ) -> Result<ExtractedText, ExtractionError> {
        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            let png = raster::page_image_upscaled(document, page_index)?;
            let text = self.ocr.recognize(&png).await?;
            pages.push(text);
        }

        Ok(ExtractedText {
            content: join_pages(&pages),
            strategy: SourceStrategy::OpticalRecognition,
            page_count,
        })
    }
}

fn needs_recognition(glyphs: usize) -> bool {
    glyphs < NATIVE_TEXT_THRESHOLD
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
}
