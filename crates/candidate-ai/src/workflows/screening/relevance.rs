//! Résumé-to-opportunity relevance ranking.
//!
//! One oracle request per matching pass covers every opportunity. A
//! missing or malformed reply degrades to an empty match list so callers
//! fall back to unranked order; ranking is enrichment, not a gate.

use std::sync::Arc;

use serde::Deserialize;

use super::domain::{Opportunity, RelevanceMatch};
use crate::oracle::{payload, OracleClient, OracleRequest};

/// Bounded prefix of the résumé text sent to the oracle.
pub const RESUME_PREFIX_CHARS: usize = 2000;
/// Bounded prefix of each opportunity description sent to the oracle.
pub const DESCRIPTION_PREFIX_CHARS: usize = 400;

const MATCHING_SYSTEM_PROMPT: &str = "\
You are a technical recruiter scoring how well one candidate fits a set \
of open roles. Judge only from the résumé text and role descriptions \
given. Reply with strict JSON and nothing else.";

pub struct RelevanceMatcher<O> {
    oracle: Arc<O>,
}

impl<O: OracleClient> RelevanceMatcher<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Rank every opportunity against the résumé in one oracle pass.
    /// Returns matches sorted by descending score; ties keep the input
    /// order. Any oracle failure yields an empty list.
    pub async fn rank(
        &self,
        resume_text: &str,
        opportunities: &[Opportunity],
    ) -> Vec<RelevanceMatch> {
        if opportunities.is_empty() {
            return Vec::new();
        }

        let request = OracleRequest::text(
            MATCHING_SYSTEM_PROMPT,
            matching_prompt(resume_text, opportunities),
        );

        let reply = match self.oracle.complete(request).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "relevance oracle call failed, returning unranked");
                return Vec::new();
            }
        };

        let rows: Vec<RelevanceRow> = match payload::parse_oracle_json(&reply) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(error = %err, "relevance reply unusable, returning unranked");
                return Vec::new();
            }
        };

        let mut matches: Vec<RelevanceMatch> = opportunities
            .iter()
            .filter_map(|opportunity| {
                rows.iter()
                    .find(|row| row.opportunity_id == opportunity.id.0)
                    .map(|row| RelevanceMatch {
                        opportunity_id: opportunity.id.clone(),
                        score: row.score.clamp(0, 100) as u8,
                        reason: row.reason.clone(),
                        matching_skills: row.matching_skills.clone(),
                        missing_skills: row.missing_skills.clone(),
                    })
            })
            .collect();

        // Stable sort: equal scores keep the opportunities' input order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}

fn matching_prompt(resume_text: &str, opportunities: &[Opportunity]) -> String {
    let mut prompt = String::new();
    prompt.push_str("Candidate résumé (may be truncated):\n---\n");
    prompt.push_str(truncate_chars(resume_text, RESUME_PREFIX_CHARS));
    prompt.push_str("\n---\n\nOpen roles:\n");

    for opportunity in opportunities {
        prompt.push_str(&format!(
            "- id: {}\n  title: {}\n  required skills: {}\n  description: {}\n",
            opportunity.id.0,
            opportunity.title,
            opportunity.required_skills.join(", "),
            truncate_chars(&opportunity.description, DESCRIPTION_PREFIX_CHARS),
        ));
    }

    prompt.push_str(
        "\nScore every role from 0 to 100 for fit against this résumé. Respond with a \
         JSON array, one object per role: {\"opportunity_id\": string, \"score\": integer, \
         \"reason\": string, \"matching_skills\": [string], \"missing_skills\": [string]}.",
    );
    prompt
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[derive(Debug, Deserialize)]
struct RelevanceRow {
    opportunity_id: String,
    score: i64,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    matching_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
}
