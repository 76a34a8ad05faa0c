//! Grading pipeline: deterministic multiple-choice scoring plus one
//! batched oracle pass for everything qualitative.
//!
//! Failure policy: if the oracle call fails or its reply is unusable, the
//! whole grading call fails with [`GradingError::Unavailable`]. There is
//! no local fallback for oracle-graded items, so one result never mixes
//! oracle-scored and heuristically-scored answers. Only a genuinely
//! missing answer produces a zero.

mod config;
mod prompts;
mod response;

pub use config::GradingConfig;

use std::collections::BTreeMap;
use std::sync::Arc;

use prompts::{grading_prompt, OracleWorkItem, GRADING_SYSTEM_PROMPT};

use super::domain::{
    AssessmentItem, AssessmentResult, ItemGradingResult, ItemKind, SkillScore, Submission,
    ViolationLog,
};
use crate::oracle::{OracleClient, OracleError, OracleRequest};

/// Maximum score per oracle-graded item.
pub const ORACLE_ITEM_MAX_SCORE: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    /// The oracle grading call failed; nothing was scored or persisted.
    #[error("grading oracle unavailable: {0}")]
    Unavailable(#[from] OracleError),
}

pub struct GradingPipeline<O> {
    oracle: Arc<O>,
    config: GradingConfig,
}

enum PendingItem {
    /// Scored locally, result already final.
    Settled(ItemGradingResult),
    /// Awaiting the batched oracle reply.
    AwaitingOracle { queue_index: usize },
}

impl<O: OracleClient> GradingPipeline<O> {
    pub fn new(oracle: Arc<O>, config: GradingConfig) -> Self {
        Self { oracle, config }
    }

    /// Grade a submission against its item list. Items are graded exactly
    /// once, in presentation order.
    pub async fn grade(
        &self,
        items: &[AssessmentItem],
        submission: &Submission,
    ) -> Result<AssessmentResult, GradingError> {
        let mut pending = Vec::with_capacity(items.len());
        let mut queue: Vec<OracleWorkItem<'_>> = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let answer = submission.answers.get(&index).map(String::as_str);
            match (item.kind, answer) {
                (ItemKind::MultipleChoice, _) => {
                    pending.push(PendingItem::Settled(
                        self.grade_multiple_choice(item, answer),
                    ));
                }
                // Missing answers never reach the oracle.
                (_, None) => pending.push(PendingItem::Settled(unanswered(item))),
                (_, Some(answer)) => {
                    pending.push(PendingItem::AwaitingOracle {
                        queue_index: queue.len(),
                    });
                    queue.push(OracleWorkItem { item, answer });
                }
            }
        }

        let (oracle_rows, credibility, analysis) = if queue.is_empty() {
            (BTreeMap::new(), None, None)
        } else {
            let request = OracleRequest::text(
                GRADING_SYSTEM_PROMPT,
                grading_prompt(&queue, &submission.violations),
            )
            .with_max_tokens(4096);
            let reply = self.oracle.complete(request).await?;

            let expected: Vec<&str> = queue.iter().map(|work| work.item.id.as_str()).collect();
            response::parse_grading_reply(&reply, &expected)?
        };

        let graded: Vec<ItemGradingResult> = pending
            .into_iter()
            .map(|entry| match entry {
                PendingItem::Settled(result) => result,
                PendingItem::AwaitingOracle { queue_index } => {
                    let work = &queue[queue_index];
                    let row = &oracle_rows[work.item.id.as_str()];
                    ItemGradingResult {
                        item_id: work.item.id.clone(),
                        user_answer: Some(work.answer.to_string()),
                        correct_answer_or_model: work.item.reference_context.clone(),
                        is_correct: row.score >= ORACLE_ITEM_MAX_SCORE / 2,
                        score: row.score,
                        max_score: ORACLE_ITEM_MAX_SCORE,
                        feedback: row.feedback.clone(),
                        plagiarism_suspected: row.plagiarism_suspected,
                    }
                }
            })
            .collect();

        Ok(self.aggregate(items, graded, &submission.violations, credibility, analysis))
    }

    fn grade_multiple_choice(
        &self,
        item: &AssessmentItem,
        answer: Option<&str>,
    ) -> ItemGradingResult {
        let correct_option = item.correct_option.clone().unwrap_or_default();
        // Exact, case-sensitive equality. Full credit or zero.
        let is_correct = answer.is_some_and(|given| given == correct_option);
        let weight = self.config.multiple_choice_weight;

        let feedback = match answer {
            None => "no answer submitted".to_string(),
            Some(_) if is_correct => "correct".to_string(),
            Some(_) => "incorrect".to_string(),
        };

        ItemGradingResult {
            item_id: item.id.clone(),
            user_answer: answer.map(str::to_string),
            correct_answer_or_model: correct_option,
            is_correct,
            score: if is_correct { weight } else { 0 },
            max_score: weight,
            feedback,
            plagiarism_suspected: false,
        }
    }

    fn aggregate(
        &self,
        source_items: &[AssessmentItem],
        items: Vec<ItemGradingResult>,
        violations: &ViolationLog,
        credibility: Option<u8>,
        analysis: Option<String>,
    ) -> AssessmentResult {
        let total_score: u32 = items.iter().map(|item| item.score).sum();
        let max_score: u32 = items.iter().map(|item| item.max_score).sum();
        let percentage = percentage_of(total_score, max_score);

        // Graded results line up with the presented items by position.
        let mut per_skill: BTreeMap<String, SkillScore> = BTreeMap::new();
        for (source, graded) in source_items.iter().zip(&items) {
            let entry = per_skill.entry(source.skill.clone()).or_default();
            entry.score += graded.score;
            entry.total += graded.max_score;
        }

        AssessmentResult {
            total_score,
            max_score,
            percentage,
            credibility_score: credibility.unwrap_or_else(|| fallback_credibility(violations)),
            cheating_analysis: analysis.unwrap_or_else(|| fallback_analysis(violations)),
            per_skill,
            items,
        }
    }
}

fn unanswered(item: &AssessmentItem) -> ItemGradingResult {
    ItemGradingResult {
        item_id: item.id.clone(),
        user_answer: None,
        correct_answer_or_model: item.reference_context.clone(),
        is_correct: false,
        score: 0,
        max_score: ORACLE_ITEM_MAX_SCORE,
        feedback: "no answer submitted".to_string(),
        plagiarism_suspected: false,
    }
}

fn percentage_of(total_score: u32, max_score: u32) -> u8 {
    if max_score == 0 {
        return 0;
    }
    let ratio = f64::from(total_score) * 100.0 / f64::from(max_score);
    ratio.round().clamp(0.0, 100.0) as u8
}

/// Derived credibility when no oracle-graded item was answered: start at
/// 100 and charge each recorded violation.
fn fallback_credibility(violations: &ViolationLog) -> u8 {
    let penalty = violations.focus_loss_count * 10 + violations.paste_attempt_count * 15;
    100u32.saturating_sub(penalty).min(100) as u8
}

fn fallback_analysis(violations: &ViolationLog) -> String {
    if violations.focus_loss_count == 0 && violations.paste_attempt_count == 0 {
        "No behavioral anomalies recorded during the session.".to_string()
    } else {
        format!(
            "Session recorded {} focus loss(es) and {} paste attempt(s); no qualitative answers were available for stylistic review.",
            violations.focus_loss_count, violations.paste_attempt_count
        )
    }
}
