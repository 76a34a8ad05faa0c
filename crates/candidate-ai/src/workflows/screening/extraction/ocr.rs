//! Optical recognition through the oracle's vision interface.

use std::future::Future;
use std::sync::Arc;

use base64::Engine as _;

use super::ExtractionError;
use crate::oracle::{OracleClient, OracleRequest};

const RECOGNITION_SYSTEM_PROMPT: &str = "\
You are a document text extractor. Extract ALL visible text from the \
provided page image, top to bottom, preserving line breaks. Output the \
text only, with no commentary.";

const RECOGNITION_USER_PROMPT: &str = "\
Extract every piece of visible text from this page image. Preserve the \
reading order and line structure. Do not describe the image; output the \
text verbatim.";

/// Seam for the image-to-text step so extraction is testable without a
/// vision model.
pub trait OcrEngine: Send + Sync {
    fn recognize(
        &self,
        image_png: &[u8],
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send;
}

/// Production engine: ships the page PNG to the oracle's vision model.
pub struct OracleVisionOcr<O> {
    oracle: Arc<O>,
}

impl<O: OracleClient> OracleVisionOcr<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }
}

impl<O: OracleClient> OcrEngine for OracleVisionOcr<O> {
    async fn recognize(&self, image_png: &[u8]) -> Result<String, ExtractionError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_png);
        let request = OracleRequest::text(RECOGNITION_SYSTEM_PROMPT, RECOGNITION_USER_PROMPT)
            .with_images(vec![encoded])
            .with_max_tokens(4096);

        self.oracle
            .complete(request)
            .await
            .map_err(|err| ExtractionError::Recognition(err.to_string()))
    }
}
