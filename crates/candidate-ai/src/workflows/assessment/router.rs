use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{AssessmentId, AssessmentItem, ItemKind, Submission};
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};
use super::session::SubmissionTrigger;
use crate::oracle::OracleClient;
use crate::workflows::screening::domain::{CandidateProfile, Opportunity};

/// Router builder exposing HTTP endpoints for starting and submitting
/// assessment attempts.
pub fn assessment_router<R, O>(service: Arc<AssessmentService<R, O>>) -> Router
where
    R: AssessmentRepository + 'static,
    O: OracleClient + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(begin_handler::<R, O>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(status_handler::<R, O>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/submission",
            post(submit_handler::<R, O>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct BeginRequest {
    pub opportunity: Opportunity,
}

/// Item as shown to a candidate: never includes the correct option.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub id: String,
    pub kind: &'static str,
    pub prompt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ItemView {
    fn from_item(item: &AssessmentItem) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind.label(),
            prompt: item.prompt.clone(),
            options: if item.kind == ItemKind::MultipleChoice {
                item.options.clone()
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BeginResponse {
    pub assessment_id: AssessmentId,
    pub duration_minutes: u32,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub submission: Submission,
    #[serde(default = "default_trigger")]
    pub trigger: SubmissionTrigger,
    #[serde(default)]
    pub relevance_score: Option<u8>,
    #[serde(default)]
    pub profile: Option<CandidateProfile>,
}

fn default_trigger() -> SubmissionTrigger {
    SubmissionTrigger::Manual
}

pub(crate) async fn begin_handler<R, O>(
    State(service): State<Arc<AssessmentService<R, O>>>,
    axum::Json(request): axum::Json<BeginRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    O: OracleClient + 'static,
{
    match service.begin(request.opportunity) {
        Ok(record) => {
            let response = BeginResponse {
                assessment_id: record.assessment_id.clone(),
                duration_minutes: record
                    .opportunity
                    .duration_minutes
                    .unwrap_or(super::session::DEFAULT_DURATION_MINUTES),
                items: record.items.iter().map(ItemView::from_item).collect(),
            };
            (StatusCode::CREATED, axum::Json(response)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<R, O>(
    State(service): State<Arc<AssessmentService<R, O>>>,
    Path(assessment_id): Path<String>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    O: OracleClient + 'static,
{
    let id = AssessmentId(assessment_id);
    let SubmitRequest {
        submission,
        trigger,
        relevance_score,
        profile,
    } = request;

    match service
        .submit(&id, submission, trigger, relevance_score, profile.as_ref())
        .await
    {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(AssessmentServiceError::Grading(error)) => {
            // Unresolved, not failed: the caller may retry or resubmit.
            let payload = json!({ "error": error.to_string(), "retryable": true });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "assessment not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, O>(
    State(service): State<Arc<AssessmentService<R, O>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    O: OracleClient + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "assessment not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
