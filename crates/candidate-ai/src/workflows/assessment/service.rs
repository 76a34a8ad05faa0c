use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::bank::QuestionBank;
use super::confidence::confidence_index;
use super::domain::{AssessmentId, AssessmentStatus, Submission};
use super::grading::{GradingConfig, GradingError, GradingPipeline};
use super::integrity::IntegrityAnalyzer;
use super::repository::{AssessmentRecord, AssessmentRepository, RepositoryError};
use super::selector;
use super::session::SubmissionTrigger;
use crate::oracle::OracleClient;
use crate::workflows::screening::domain::{CandidateProfile, Opportunity};

/// Service composing question selection, grading, integrity analysis, and
/// the confidence aggregate around a repository.
pub struct AssessmentService<R, O> {
    repository: Arc<R>,
    bank: QuestionBank,
    grading: GradingPipeline<O>,
    integrity: IntegrityAnalyzer<O>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asmt-{id:06}"))
}

impl<R, O> AssessmentService<R, O>
where
    R: AssessmentRepository + 'static,
    O: OracleClient + 'static,
{
    pub fn new(repository: Arc<R>, oracle: Arc<O>, bank: QuestionBank, config: GradingConfig) -> Self {
        Self {
            repository,
            bank,
            grading: GradingPipeline::new(oracle.clone(), config),
            integrity: IntegrityAnalyzer::new(oracle),
        }
    }

    /// Start a new attempt: select questions for the opportunity and
    /// persist the active record.
    pub fn begin(&self, opportunity: Opportunity) -> Result<AssessmentRecord, AssessmentServiceError> {
        let items = selector::select(&self.bank, &opportunity);

        let record = AssessmentRecord {
            assessment_id: next_assessment_id(),
            opportunity,
            items,
            status: AssessmentStatus::Active,
            violation_flag: false,
            trigger: None,
            result: None,
            integrity: None,
            confidence: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Grade a submission and persist the outcome exactly once.
    ///
    /// Re-submission against a graded attempt is a no-op returning the
    /// stored record, which makes the terminal-submission race idempotent
    /// at the persistence layer as well. A grading failure leaves the
    /// record untouched and active so the caller can retry.
    pub async fn submit(
        &self,
        assessment_id: &AssessmentId,
        submission: Submission,
        trigger: SubmissionTrigger,
        relevance_score: Option<u8>,
        profile: Option<&CandidateProfile>,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.result.is_some() {
            return Ok(record);
        }

        let result = self.grading.grade(&record.items, &submission).await?;

        let integrity = match profile {
            Some(profile) => {
                self.integrity
                    .analyze(profile, &result, &record.opportunity)
                    .await
            }
            None => None,
        };

        // Consistency comes from the integrity pass when it ran; the
        // aggregator derives a spread-based stand-in otherwise.
        let consistency = integrity.as_ref().map(|report| report.integrity_score);
        let confidence = confidence_index(result.percentage, relevance_score, consistency);

        record.violation_flag = matches!(trigger, SubmissionTrigger::ViolationForced)
            || submission.violations.focus_loss_count > 0;
        record.trigger = Some(trigger);
        record.status = AssessmentStatus::Graded;
        record.result = Some(result);
        record.integrity = integrity;
        record.confidence = Some(confidence);

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Fetch an attempt for API responses.
    pub fn get(&self, assessment_id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Grading(#[from] GradingError),
}
