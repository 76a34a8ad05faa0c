use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for advertised opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Opportunity record as supplied by the posting collaborator. The
/// pipeline reads it; it never writes one back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Assessment session length; `None` falls back to the default.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub posted_on: Option<NaiveDate>,
}

/// Résumé-derived skill-claim profile. Its presence is what switches the
/// integrity analyzer on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: String,
    pub claimed_skills: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// One ranked résumé-to-opportunity fit produced by the relevance matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceMatch {
    pub opportunity_id: OpportunityId,
    pub score: u8,
    pub reason: String,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}
