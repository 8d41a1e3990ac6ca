//! # stage-types
//!
//! Type definitions for SEER historic stage, summary stage and pre-1988 AJCC
//! stage recodes.
//!
//! This crate provides the types shared between the lookup table loader and
//! the recode engine: the record field layout, the recode output kinds and
//! output set, the Collaborative Stage recode categories, and well-known codes.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use stage_types::{RecodeKind, RecodeOutputSet, RecordField, RecordFields};
//! use stage_types::well_known;
//!
//! let record = RecordFields::default()
//!     .with(RecordField::EodCodingSystem, "2")
//!     .with(RecordField::Histology, "9650");
//!
//! let mut output = RecodeOutputSet::new();
//! output.set(RecodeKind::Historic2000, well_known::UNSTAGED_LYMPHOMA_LEUKEMIA);
//!
//! assert_eq!(record.get(RecordField::EodCodingSystem), "2");
//! assert_eq!(output.get(RecodeKind::Historic2000), "95");
//! ```

#![warn(missing_docs)]

mod enums;
mod fields;
mod output;
pub mod well_known;

// Re-export all public types at crate root
pub use enums::{CsRecode, RecodeKind};
pub use fields::{RecordField, RecordFields};
pub use output::RecodeOutputSet;
