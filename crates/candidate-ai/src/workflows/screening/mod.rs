//! Résumé screening: document text extraction, opportunity import, and
//! oracle-backed relevance ranking.
//!
//! Extraction and ranking are independent of the assessment workflow; the
//! only coupling is the relevance score that the confidence aggregate
//! consumes after grading.

pub mod domain;
pub mod extraction;
pub mod import;
pub mod relevance;

pub use domain::{CandidateProfile, Opportunity, OpportunityId, RelevanceMatch};
pub use extraction::{DocumentExtractor, ExtractedText, ExtractionError, SourceStrategy};
pub use import::{OpportunityCsvImporter, OpportunityImportError};
pub use relevance::RelevanceMatcher;
