use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessment attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Scoring strategy families for bank items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    MultipleChoice,
    FreeText,
    CodeChallenge,
}

impl ItemKind {
    pub const fn label(self) -> &'static str {
        match self {
            ItemKind::MultipleChoice => "multiple_choice",
            ItemKind::FreeText => "free_text",
            ItemKind::CodeChallenge => "code_challenge",
        }
    }

    /// Whether grading this kind requires the oracle.
    pub const fn oracle_graded(self) -> bool {
        !matches!(self, ItemKind::MultipleChoice)
    }
}

/// One question as presented to a candidate. `options` and
/// `correct_option` are populated for multiple choice only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentItem {
    pub id: String,
    pub kind: ItemKind,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_option: Option<String>,
    /// Skill bucket feeding the per-skill breakdown.
    pub skill: String,
    /// Model answer or supporting context handed to the oracle grader.
    #[serde(default)]
    pub reference_context: String,
}

/// Candidate answers keyed by item index, plus the session's violation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
    pub violations: ViolationLog,
}

/// Behavioral signals collected by the session monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationLog {
    pub focus_loss_count: u32,
    pub paste_attempt_count: u32,
    pub elapsed_seconds: u32,
}

/// Outcome for a single graded item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGradingResult {
    pub item_id: String,
    pub user_answer: Option<String>,
    pub correct_answer_or_model: String,
    pub is_correct: bool,
    pub score: u32,
    pub max_score: u32,
    pub feedback: String,
    pub plagiarism_suspected: bool,
}

/// Per-skill score accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScore {
    pub score: u32,
    pub total: u32,
}

/// The scored, integrity-annotated outcome of one submission. Created
/// once per submission; append-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u8,
    pub credibility_score: u8,
    pub cheating_analysis: String,
    pub per_skill: BTreeMap<String, SkillScore>,
    pub items: Vec<ItemGradingResult>,
}

/// Cross-check between claimed skills and observed performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub integrity_score: u8,
    #[serde(default)]
    pub flags: Vec<String>,
    pub bot_probability: u8,
    #[serde(default)]
    pub skill_validation: Vec<SkillValidation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillValidation {
    pub skill: String,
    pub claimed: bool,
    pub observed_performance: String,
    pub status: ValidationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Verified,
    Suspicious,
}

/// Blended hiring-readiness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIndex {
    pub score: u8,
    pub level: ConfidenceLevel,
    pub breakdown: ConfidenceBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub test_weighted: f32,
    pub relevance_weighted: f32,
    pub consistency_weighted: f32,
}

/// High level status tracked for an assessment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStatus {
    Active,
    Graded,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Active => "active",
            AssessmentStatus::Graded => "graded",
        }
    }
}
