use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentId, AssessmentItem, AssessmentResult, AssessmentStatus, ConfidenceIndex,
    IntegrityReport,
};
use super::session::SubmissionTrigger;
use crate::workflows::screening::domain::Opportunity;

/// Repository record for one assessment attempt. The result is written
/// once at submission time and never reshaped afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment_id: AssessmentId,
    pub opportunity: Opportunity,
    pub items: Vec<AssessmentItem>,
    pub status: AssessmentStatus,
    pub violation_flag: bool,
    pub trigger: Option<SubmissionTrigger>,
    pub result: Option<AssessmentResult>,
    pub integrity: Option<IntegrityReport>,
    pub confidence: Option<ConfidenceIndex>,
}

impl AssessmentRecord {
    pub fn status_view(&self) -> AssessmentStatusView {
        AssessmentStatusView {
            assessment_id: self.assessment_id.clone(),
            status: self.status.label(),
            violation_flag: self.violation_flag,
            percentage: self.result.as_ref().map(|result| result.percentage),
            credibility_score: self
                .result
                .as_ref()
                .map(|result| result.credibility_score),
            confidence_score: self.confidence.as_ref().map(|confidence| confidence.score),
            confidence_level: self
                .confidence
                .as_ref()
                .map(|confidence| confidence.level.label()),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn pending(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of an attempt's exposed status. Never leaks
/// correct options or raw items.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub status: &'static str,
    pub violation_flag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<&'static str>,
}
