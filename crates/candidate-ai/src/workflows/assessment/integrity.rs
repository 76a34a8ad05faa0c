//! Best-effort integrity analysis.
//!
//! Runs only when a résumé skill-claim profile is available. Grading is
//! the critical path; this pass is enrichment, so every failure is
//! logged and swallowed rather than surfaced.

use std::sync::Arc;

use serde::Deserialize;

use super::domain::{AssessmentResult, IntegrityReport, SkillValidation, ValidationStatus};
use crate::oracle::{payload, OracleClient, OracleRequest};
use crate::workflows::screening::domain::{CandidateProfile, Opportunity};

const INTEGRITY_SYSTEM_PROMPT: &str = "\
You are an assessment-integrity reviewer. Compare the candidate's claimed \
skills against their measured per-skill performance and session behavior, \
and estimate how likely the session reflects genuine unaided work. Reply \
with strict JSON and nothing else.";

pub struct IntegrityAnalyzer<O> {
    oracle: Arc<O>,
}

impl<O: OracleClient> IntegrityAnalyzer<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Second oracle pass over claims vs. observed performance. Returns
    /// `None` on any failure.
    pub async fn analyze(
        &self,
        profile: &CandidateProfile,
        result: &AssessmentResult,
        opportunity: &Opportunity,
    ) -> Option<IntegrityReport> {
        let request = OracleRequest::text(
            INTEGRITY_SYSTEM_PROMPT,
            integrity_prompt(profile, result, opportunity),
        );

        let reply = match self.oracle.complete(request).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "integrity oracle call failed, omitting report");
                return None;
            }
        };

        match payload::parse_oracle_json::<IntegrityReply>(&reply) {
            Ok(parsed) => Some(parsed.into_report()),
            Err(err) => {
                tracing::warn!(error = %err, "integrity reply unusable, omitting report");
                None
            }
        }
    }
}

fn integrity_prompt(
    profile: &CandidateProfile,
    result: &AssessmentResult,
    opportunity: &Opportunity,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Role: {}\nRole description: {}\n\n",
        opportunity.title, opportunity.description
    ));
    prompt.push_str(&format!(
        "Claimed skills: {}\nRésumé summary: {}\n\n",
        profile.claimed_skills.join(", "),
        profile.summary
    ));

    prompt.push_str(&format!(
        "Assessment outcome: {}/{} points ({}%), credibility {}.\n",
        result.total_score, result.max_score, result.percentage, result.credibility_score
    ));
    prompt.push_str("Per-skill performance:\n");
    for (skill, score) in &result.per_skill {
        prompt.push_str(&format!("- {}: {}/{}\n", skill, score.score, score.total));
    }
    prompt.push_str(&format!(
        "Cheating analysis from grading: {}\n",
        result.cheating_analysis
    ));

    prompt.push_str(
        "\nRespond with a JSON object: {\"integrity_score\": integer 0-100, \"flags\": [string], \
         \"bot_probability\": integer 0-100, \"skill_validation\": [{\"skill\": string, \
         \"claimed\": boolean, \"observed_performance\": string, \"status\": \"verified\" or \
         \"suspicious\"}]}.",
    );
    prompt
}

#[derive(Debug, Deserialize)]
struct IntegrityReply {
    integrity_score: u8,
    #[serde(default)]
    flags: Vec<String>,
    bot_probability: u8,
    #[serde(default)]
    skill_validation: Vec<SkillValidationRow>,
}

#[derive(Debug, Deserialize)]
struct SkillValidationRow {
    skill: String,
    #[serde(default)]
    claimed: bool,
    #[serde(default)]
    observed_performance: String,
    status: ValidationStatus,
}

impl IntegrityReply {
    fn into_report(self) -> IntegrityReport {
        IntegrityReport {
            integrity_score: self.integrity_score.min(100),
            flags: self.flags,
            bot_probability: self.bot_probability.min(100),
            skill_validation: self
                .skill_validation
                .into_iter()
                .map(|row| SkillValidation {
                    skill: row.skill,
                    claimed: row.claimed,
                    observed_performance: row.observed_performance,
                    status: row.status,
                })
                .collect(),
        }
    }
}
