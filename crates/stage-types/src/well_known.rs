//! Well-known stage codes and field values.
//!
//! Sentinel codes are distinct from a blank output: a blank means the output
//! does not apply to the record, a sentinel means it applies but could not be
//! staged.
//!
//! # Examples
//!
//! ```
//! use stage_types::well_known;
//!
//! assert_eq!(well_known::UNKNOWN_SUMMARY_STAGE, "9");
//! assert_eq!(well_known::UNKNOWN_HISTORIC_STAGE, "99");
//! assert_eq!(well_known::CS_UNRESOLVED_HISTORIC_STAGE, "60");
//! ```

// =============================================================================
// Sentinel Output Codes
// =============================================================================

/// Blank output: the recode does not apply.
pub const BLANK: &str = "";

/// Summary stage (1977 or 2000) that could not be staged.
pub const UNKNOWN_SUMMARY_STAGE: &str = "9";

/// Historic stage or pre-1988 AJCC stage that could not be staged.
pub const UNKNOWN_HISTORIC_STAGE: &str = "99";

/// Historic stage fallback when the Collaborative Stage tables do not resolve.
pub const CS_UNRESOLVED_HISTORIC_STAGE: &str = "60";

/// Historic stage for unstaged lymphoma and leukemia (histology 9590-9979).
pub const UNSTAGED_LYMPHOMA_LEUKEMIA: &str = "95";

/// Historic stage "unstaged" used for death certificate only cases,
/// brain overrides and early 9140 cases.
pub const UNSTAGED_HISTORIC_STAGE: &str = "90";

/// Historic stage "distant".
pub const DISTANT_HISTORIC_STAGE: &str = "40";

/// Historic stage bladder cases are moved to from in situ or localized.
pub const BLADDER_HISTORIC_STAGE: &str = "11";

/// Unresolved extension or nodes recode in the legacy schemes.
pub const UNKNOWN_RECODE: &str = "99";

// =============================================================================
// Field Values
// =============================================================================

/// Reporting source "death certificate only".
pub const DEATH_CERTIFICATE_ONLY: &str = "7";

/// Behavior code for in situ tumors.
pub const BEHAVIOR_IN_SITU: &str = "2";

/// Behavior code for malignant tumors.
pub const BEHAVIOR_MALIGNANT: &str = "3";

/// Leukemia table result marking a leukemia case.
pub const LEUKEMIA_FLAG: &str = "1";

/// Registry that did not provide EOD codes for 1988-1991 diagnoses.
pub const LOS_ANGELES_REGISTRY: i64 = 1535;

/// First diagnosis year coded under Collaborative Stage.
pub const CS_FIRST_YEAR: i64 = 2004;

/// Last diagnosis year (exclusive) for which pre-1988 AJCC stage is defined.
pub const AJCC_LAST_YEAR_EXCLUSIVE: i64 = 1988;

/// CS field version from which CS extension/nodes/mets are full width.
pub const CS_FULL_WIDTH_VERSION: u32 = 12;
