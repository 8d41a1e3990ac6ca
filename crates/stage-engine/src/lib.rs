//! # stage-engine
//!
//! Cascading lookup engine that recodes cancer records into SEER Historic
//! Stage 2000, Summary Stage 1977/2000 (clinical and prostate pathological)
//! and pre-1988 AJCC stage.
//!
//! The resolution path for a record is chosen from its year of diagnosis and
//! EOD coding system:
//!
//! - no coding system before 2004: every output blank
//! - 2004 on: Collaborative Stage historic stage
//! - scheme 4: summary stage and historic stage from modern EOD
//! - schemes 0 to 3: historic stage from the legacy EOD codes, then the
//!   pre-1988 AJCC stage
//!
//! A missing table row is an expected outcome. Every resolver converts it
//! into a sentinel code or an empty output, counts unresolved outputs and
//! marks the record; nothing escapes a single record.
//!
//! ## Features
//!
//! - `parallel` (default): Recodes batches in parallel via rayon.
//! - `serde` (default): Serializable outcomes and counters.
//!
//! ## Usage
//!
//! ```rust
//! use stage_engine::{EngineConfig, StageRecoder};
//! use stage_tables::StageTables;
//! use stage_types::{RecodeKind, RecordField, RecordFields};
//!
//! let recoder = StageRecoder::new(StageTables::new(), EngineConfig::default());
//!
//! let record = RecordFields::default()
//!     .with(RecordField::YearOfDiagnosis, "1985")
//!     .with(RecordField::PrimarySite, "C180")
//!     .with(RecordField::Histology, "9650")
//!     .with(RecordField::EodCodingSystem, "2");
//!
//! let outcome = recoder.recode(0, &record);
//! assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "95");
//! assert!(!outcome.unresolved);
//! ```

#![warn(missing_docs)]

mod ajcc;
pub mod classify;
mod collaborative;
mod context;
pub mod derive;
mod error;
mod fallback;
mod historic;
mod recoder;
mod scheme4;
mod summary;
mod tracker;

pub use collaborative::pleura_extension_recode;
pub use error::RecordFailure;
pub use fallback::{FallbackChain, LookupStep, Resolved};
pub use recoder::{EngineConfig, RecodeOutcome, StageRecoder};
pub use summary::reconcile_ssg2000;
pub use tracker::{RecordTally, UnresolvedCounts, UnresolvedTracker};
