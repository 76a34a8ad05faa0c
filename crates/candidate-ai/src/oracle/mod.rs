//! Client plumbing for the external qualitative-reasoning oracle.
//!
//! Every pipeline stage that needs qualitative judgment (relevance ranking,
//! free-text/code grading, integrity analysis, optical recognition) goes
//! through the `OracleClient` seam defined here. Call-sites build one
//! structured request per stage, never one per item, and parse the reply
//! through `payload::parse_oracle_json` so there is exactly one place that
//! deals with markdown-fenced responses.

mod client;
pub mod payload;

pub use client::HttpOracleClient;

use std::future::Future;

/// Error raised by oracle transport and response handling.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle transport failure: {0}")]
    Unavailable(String),
    #[error("oracle returned no content")]
    EmptyResponse,
    #[error("oracle response is not valid JSON: {0}")]
    MalformedResponse(String),
}

/// One structured prompt for the oracle. Images ride along base64-encoded
/// for the optical-recognition path; everything else is plain text.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub system: Option<String>,
    pub user: String,
    pub images_png_base64: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl OracleRequest {
    pub fn text(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
            images_png_base64: Vec::new(),
            temperature: 0.2,
            max_tokens: 2048,
        }
    }

    pub fn with_images(mut self, images_png_base64: Vec<String>) -> Self {
        self.images_png_base64 = images_png_base64;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Seam between the pipelines and the remote reasoning service, so tests
/// and the demo can substitute scripted responses.
pub trait OracleClient: Send + Sync {
    fn complete(
        &self,
        request: OracleRequest,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;
}
