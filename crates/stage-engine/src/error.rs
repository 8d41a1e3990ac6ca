//! Per-record failures.

use stage_tables::LookupError;
use thiserror::Error;

/// A failure that ends resolution of one output for one record.
///
/// Never escapes [`StageRecoder::recode`](crate::StageRecoder::recode): the
/// affected outputs are set to sentinel codes and the record is marked
/// unresolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordFailure {
    /// Breast schema extension 050/070 with a behavior other than in situ or
    /// malignant.
    #[error("Bad Breast Behavior: {behavior}")]
    BadBreastBehavior {
        /// The behavior code found.
        behavior: String,
    },

    /// Pleura schema extension and SSF1 combination not enumerated.
    #[error("Bad Pleura Extension/SSF1({extension}/{ssf1})")]
    BadPleuraExtension {
        /// The (repadded) CS extension.
        extension: String,
        /// The SSF1 value.
        ssf1: String,
    },

    /// A required lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
