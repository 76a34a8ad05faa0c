use super::normalizer::normalize_skill;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct OpportunityRecord {
    pub(crate) external_id: Option<String>,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) skills: Vec<String>,
    pub(crate) duration_minutes: Option<u32>,
    pub(crate) posted_on: Option<NaiveDate>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<OpportunityRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<OpportunityRow>() {
        let row = record?;
        records.push(OpportunityRecord {
            external_id: row.id.clone(),
            title: row.title.clone(),
            skills: row.skill_list(),
            duration_minutes: row.duration_minutes(),
            posted_on: row.posted_date(),
            description: row.description.unwrap_or_default(),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct OpportunityRow {
    #[serde(rename = "Id", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    description: Option<String>,
    #[serde(
        rename = "Required Skills",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    required_skills: Option<String>,
    #[serde(
        rename = "Duration Minutes",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    duration_minutes: Option<String>,
    #[serde(
        rename = "Posted On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    posted_on: Option<String>,
}

impl OpportunityRow {
    /// Skills arrive as a `;`-separated cell; normalize and de-duplicate
    /// while preserving first-seen order.
    fn skill_list(&self) -> Vec<String> {
        let mut seen = Vec::new();
        if let Some(raw) = self.required_skills.as_deref() {
            for skill in raw.split(';') {
                let normalized = normalize_skill(skill);
                if !normalized.is_empty() && !seen.contains(&normalized) {
                    seen.push(normalized);
                }
            }
        }
        seen
    }

    fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
            .as_deref()
            .and_then(|value| value.trim().parse().ok())
    }

    fn posted_date(&self) -> Option<NaiveDate> {
        self.posted_on.as_deref().and_then(parse_date)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
