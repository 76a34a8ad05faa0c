//! Assessment evaluation: question selection, the live session monitor,
//! grading, integrity analysis, and the confidence aggregate.
//!
//! The grading pipeline is the critical path. Multiple-choice items are
//! scored deterministically in-process; free-text and code answers go to
//! the oracle in one batched call per submission. Integrity analysis and
//! relevance ranking only enrich the result — their absence never blocks
//! a grade.

pub mod bank;
pub mod confidence;
pub mod domain;
pub mod grading;
pub mod integrity;
pub mod repository;
pub mod router;
pub mod selector;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use bank::{QuestionBank, BASELINE_CATEGORY, DEFAULT_CATEGORY};
pub use confidence::confidence_index;
pub use domain::{
    AssessmentId, AssessmentItem, AssessmentResult, AssessmentStatus, ConfidenceBreakdown,
    ConfidenceIndex, ConfidenceLevel, IntegrityReport, ItemGradingResult, ItemKind, SkillScore,
    SkillValidation, Submission, ValidationStatus, ViolationLog,
};
pub use grading::{GradingConfig, GradingError, GradingPipeline, ORACLE_ITEM_MAX_SCORE};
pub use integrity::IntegrityAnalyzer;
pub use repository::{
    AssessmentRecord, AssessmentRepository, AssessmentStatusView, RepositoryError,
};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError};
pub use session::{
    SessionEvent, SessionMonitor, SessionState, SubmissionTrigger, DEFAULT_DURATION_MINUTES,
};
