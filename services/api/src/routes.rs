use crate::infra::{AppState, InMemoryAssessmentRepository};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json};
use base64::Engine as _;
use candidate_ai::error::AppError;
use candidate_ai::oracle::HttpOracleClient;
use candidate_ai::workflows::assessment::{assessment_router, AssessmentService};
use candidate_ai::workflows::screening::domain::{Opportunity, RelevanceMatch};
use candidate_ai::workflows::screening::extraction::{
    DocumentExtractor, ExtractionError, OracleVisionOcr, SourceStrategy,
};
use candidate_ai::workflows::screening::relevance::RelevanceMatcher;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Screening dependencies shared by the match endpoint.
pub(crate) struct ScreeningState {
    pub(crate) extractor: DocumentExtractor<OracleVisionOcr<HttpOracleClient>>,
    pub(crate) matcher: RelevanceMatcher<HttpOracleClient>,
}

pub(crate) fn with_service_routes(
    assessment: Arc<AssessmentService<InMemoryAssessmentRepository, HttpOracleClient>>,
    screening: Arc<ScreeningState>,
) -> axum::Router {
    assessment_router(assessment)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/screening/match", post(screening_match_endpoint))
        .layer(Extension(screening))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScreeningMatchRequest {
    /// Already-extracted résumé text; wins over the document upload.
    #[serde(default)]
    pub(crate) resume_text: Option<String>,
    /// Base64-encoded résumé document.
    #[serde(default)]
    pub(crate) resume_base64: Option<String>,
    #[serde(default)]
    pub(crate) filename: Option<String>,
    pub(crate) opportunities: Vec<Opportunity>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScreeningMatchResponse {
    pub(crate) source: ResumeSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) page_count: Option<usize>,
    /// False when the oracle pass failed and the caller should keep the
    /// opportunities in their original, unranked order.
    pub(crate) ranked: bool,
    pub(crate) matches: Vec<RelevanceMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ResumeSource {
    ProvidedText,
    NativeLayer,
    OpticalRecognition,
}

pub(crate) async fn screening_match_endpoint(
    Extension(screening): Extension<Arc<ScreeningState>>,
    Json(payload): Json<ScreeningMatchRequest>,
) -> Result<Json<ScreeningMatchResponse>, AppError> {
    let ScreeningMatchRequest {
        resume_text,
        resume_base64,
        filename,
        opportunities,
    } = payload;

    let (text, source, page_count) = match (resume_text, resume_base64) {
        (Some(text), _) => (text, ResumeSource::ProvidedText, None),
        (None, Some(encoded)) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|err| {
                    AppError::Extraction(ExtractionError::PdfParsing(format!(
                        "resume_base64 is not valid base64: {err}"
                    )))
                })?;

            if is_pdf_document(filename.as_deref(), &bytes) {
                let extracted = screening.extractor.extract(&bytes).await?;
                let source = match extracted.strategy {
                    SourceStrategy::NativeLayer => ResumeSource::NativeLayer,
                    SourceStrategy::OpticalRecognition => ResumeSource::OpticalRecognition,
                };
                (extracted.content, source, Some(extracted.page_count))
            } else {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                (text, ResumeSource::ProvidedText, None)
            }
        }
        (None, None) => {
            return Err(AppError::Extraction(ExtractionError::PdfParsing(
                "provide resume_text or resume_base64".to_string(),
            )))
        }
    };

    let matches = screening.matcher.rank(&text, &opportunities).await;
    let ranked = !matches.is_empty();

    Ok(Json(ScreeningMatchResponse {
        source,
        page_count,
        ranked,
        matches,
    }))
}

/// A document is treated as a PDF when the filename says so or the magic
/// bytes do.
fn is_pdf_document(filename: Option<&str>, bytes: &[u8]) -> bool {
    let by_name = filename
        .map(|name| {
            mime_guess::from_path(name)
                .iter()
                .any(|mime| mime == mime_guess::mime::APPLICATION_PDF)
        })
        .unwrap_or(false);

    by_name || bytes.starts_with(b"%PDF")
}
