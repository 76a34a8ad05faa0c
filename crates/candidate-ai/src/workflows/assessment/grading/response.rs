//! Wire types for the batched grading reply.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::oracle::{payload, OracleError};

use super::ORACLE_ITEM_MAX_SCORE;

#[derive(Debug, Deserialize)]
pub(super) struct GradingReply {
    pub items: Vec<GradedItemRow>,
    #[serde(default)]
    pub credibility_score: Option<u8>,
    #[serde(default)]
    pub cheating_analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GradedItemRow {
    pub item_id: String,
    pub score: u32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub plagiarism_suspected: bool,
}

/// Parse the reply and verify it grades every queued item exactly once.
/// An incomplete reply is indistinguishable from a malformed one: the
/// whole grading call fails rather than mixing confidence levels.
pub(super) fn parse_grading_reply(
    raw: &str,
    expected_item_ids: &[&str],
) -> Result<(BTreeMap<String, GradedItemRow>, Option<u8>, Option<String>), OracleError> {
    let reply: GradingReply = payload::parse_oracle_json(raw)?;

    let mut rows = BTreeMap::new();
    for mut row in reply.items {
        row.score = row.score.min(ORACLE_ITEM_MAX_SCORE);
        if rows.insert(row.item_id.clone(), row).is_some() {
            return Err(OracleError::MalformedResponse(
                "duplicate item_id in grading reply".to_string(),
            ));
        }
    }

    for item_id in expected_item_ids {
        if !rows.contains_key(*item_id) {
            return Err(OracleError::MalformedResponse(format!(
                "grading reply is missing item {item_id}"
            )));
        }
    }

    let credibility = reply.credibility_score.map(|value| value.min(100));
    Ok((rows, credibility, reply.cheating_analysis))
}
