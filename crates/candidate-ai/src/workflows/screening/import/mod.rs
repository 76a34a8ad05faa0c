mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{Opportunity, OpportunityId};

#[derive(Debug)]
pub enum OpportunityImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingTitle { row: usize },
}

impl std::fmt::Display for OpportunityImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpportunityImportError::Io(err) => {
                write!(f, "failed to read opportunity export: {}", err)
            }
            OpportunityImportError::Csv(err) => write!(f, "invalid opportunity CSV data: {}", err),
            OpportunityImportError::MissingTitle { row } => {
                write!(f, "opportunity row {} has no title", row)
            }
        }
    }
}

impl std::error::Error for OpportunityImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpportunityImportError::Io(err) => Some(err),
            OpportunityImportError::Csv(err) => Some(err),
            OpportunityImportError::MissingTitle { .. } => None,
        }
    }
}

impl From<std::io::Error> for OpportunityImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OpportunityImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Hydrates `Opportunity` records from the posting system's CSV export so
/// the relevance matcher and the demo have real listings to rank against.
pub struct OpportunityCsvImporter;

impl OpportunityCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Opportunity>, OpportunityImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Opportunity>, OpportunityImportError> {
        let mut opportunities = Vec::new();

        for (index, record) in parser::parse_records(reader)?.into_iter().enumerate() {
            if record.title.trim().is_empty() {
                return Err(OpportunityImportError::MissingTitle { row: index + 1 });
            }

            let id = record
                .external_id
                .unwrap_or_else(|| format!("opp-{:04}", index + 1));

            opportunities.push(Opportunity {
                id: OpportunityId(id),
                title: record.title,
                description: record.description,
                required_skills: record.skills,
                duration_minutes: record.duration_minutes,
                posted_on: record.posted_on,
            });
        }

        Ok(opportunities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const HEADER: &str = "Id,Title,Description,Required Skills,Duration Minutes,Posted On\n";

    #[test]
    fn imports_complete_rows() {
        let csv = format!(
            "{HEADER}opp-9,Senior Rust Engineer,Own the ingestion tier.,Rust; Tokio ;rust,45,2026-07-01\n"
        );
        let opportunities =
            OpportunityCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(opportunities.len(), 1);
        let opportunity = &opportunities[0];
        assert_eq!(opportunity.id.0, "opp-9");
        assert_eq!(opportunity.title, "Senior Rust Engineer");
        // Duplicate skill collapses after normalization.
        assert_eq!(opportunity.required_skills, vec!["rust", "tokio"]);
        assert_eq!(opportunity.duration_minutes, Some(45));
        assert_eq!(
            opportunity.posted_on,
            NaiveDate::from_ymd_opt(2026, 7, 1)
        );
    }

    #[test]
    fn assigns_sequential_ids_when_export_has_none() {
        let csv = format!("{HEADER},First Role,,,,\n,Second Role,,,,\n");
        let opportunities =
            OpportunityCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(opportunities[0].id.0, "opp-0001");
        assert_eq!(opportunities[1].id.0, "opp-0002");
        assert_eq!(opportunities[0].duration_minutes, None);
    }

    #[test]
    fn rejects_rows_without_titles() {
        let csv = format!("{HEADER}opp-1,,No title here,,,\n");
        let err = OpportunityCsvImporter::from_reader(Cursor::new(csv))
            .expect_err("title is mandatory");
        match err {
            OpportunityImportError::MissingTitle { row } => assert_eq!(row, 1),
            other => panic!("expected missing title, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let err = OpportunityCsvImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        assert!(matches!(err, OpportunityImportError::Io(_)));
    }

    #[test]
    fn normalizer_strips_zero_width_and_case() {
        let normalized = normalizer::normalize_for_tests("\u{feff}  Distributed   Systems ");
        assert_eq!(normalized, "distributed systems");
    }

    #[test]
    fn date_parser_accepts_iso_dates_only() {
        assert_eq!(
            parser::parse_date_for_tests("2026-07-01"),
            NaiveDate::from_ymd_opt(2026, 7, 1)
        );
        assert!(parser::parse_date_for_tests("07/01/2026").is_none());
        assert!(parser::parse_date_for_tests("  ").is_none());
    }
}
