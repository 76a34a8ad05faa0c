//! Assessment evaluation and integrity pipeline for hiring automation.
//!
//! The library is organized around two workflow families: `screening`
//! (résumé text extraction and opportunity relevance ranking) and
//! `assessment` (question selection, the live session monitor, grading,
//! integrity analysis, and the confidence aggregate). The `oracle` module
//! holds the client for the external qualitative-reasoning service that
//! both families call; everything else is deterministic and runs locally.

pub mod config;
pub mod error;
pub mod oracle;
pub mod telemetry;
pub mod workflows;

pub use config::AppConfig;
pub use error::AppError;
