//! Record recode orchestration.
//!
//! [`StageRecoder`] owns the loaded tables and the run's unresolved tracker.
//! Each record is resolved from its fields alone; the only state shared
//! between records is the tracker, which only accumulates.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use stage_tables::{StageTables, TableId};
use stage_types::well_known::{
    AJCC_LAST_YEAR_EXCLUSIVE, CS_FIRST_YEAR, CS_FULL_WIDTH_VERSION, DEATH_CERTIFICATE_ONLY,
    LEUKEMIA_FLAG, UNKNOWN_HISTORIC_STAGE, UNKNOWN_SUMMARY_STAGE, UNSTAGED_HISTORIC_STAGE,
};
use stage_types::{RecodeKind, RecodeOutputSet, RecordField, RecordFields};
use tracing::{debug, info};

use crate::ajcc::resolve_ajcc;
use crate::classify::{EARLY_UNSTAGED_HISTOLOGY, EARLY_UNSTAGED_LAST_YEAR};
use crate::collaborative::resolve_collaborative_stage;
use crate::context::RecodeContext;
use crate::historic::{resolve_patch, resolve_scheme, LegacyRecodes};
use crate::scheme4::resolve_scheme4;
use crate::tracker::{RecordTally, UnresolvedCounts, UnresolvedTracker};

/// Coding system value routed to the modern EOD resolver.
const SCHEME_4: &str = "4";

// =============================================================================
// Configuration
// =============================================================================

/// Engine settings injected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Collaborative Stage field version. Versions before 12 recorded CS
    /// extension, nodes and mets in a narrower format and are repadded
    /// before lookup.
    pub cs_version: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cs_version: CS_FULL_WIDTH_VERSION,
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// The result of recoding one record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecodeOutcome {
    /// Position of the record in the run.
    pub record_number: u64,
    /// The seven output codes.
    pub codes: RecodeOutputSet,
    /// Whether at least one output could not be resolved.
    pub unresolved: bool,
}

// =============================================================================
// Recoder
// =============================================================================

/// Resolves records against a loaded table set.
///
/// # Example
///
/// ```
/// use stage_engine::{EngineConfig, StageRecoder};
/// use stage_tables::{StageTables, TableId};
/// use stage_types::{RecodeKind, RecordField, RecordFields};
///
/// let mut tables = StageTables::new();
/// tables
///     .insert(TableId::Eod0HistoricStage, &["180", "8140", "1", "2"], &["10"])
///     .unwrap();
///
/// let recoder = StageRecoder::new(tables, EngineConfig::default());
/// let record = RecordFields::default()
///     .with(RecordField::YearOfDiagnosis, "1978")
///     .with(RecordField::PrimarySite, "C180")
///     .with(RecordField::Histology, "8140")
///     .with(RecordField::EodCodingSystem, "0")
///     .with(RecordField::Old2Digit, "12");
///
/// let outcome = recoder.recode(0, &record);
/// assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "10");
/// assert!(!outcome.unresolved);
/// ```
pub struct StageRecoder {
    tables: StageTables,
    config: EngineConfig,
    tracker: UnresolvedTracker,
}

impl std::fmt::Debug for StageRecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRecoder")
            .field("tables", &self.tables.total_rows())
            .field("config", &self.config)
            .field("unresolved", &self.tracker.unresolved_record_count())
            .finish()
    }
}

impl StageRecoder {
    /// Creates a recoder over a loaded table set.
    pub fn new(tables: StageTables, config: EngineConfig) -> Self {
        Self {
            tables,
            config,
            tracker: UnresolvedTracker::new(),
        }
    }

    /// Returns the table set.
    pub fn tables(&self) -> &StageTables {
        &self.tables
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the run's unresolved tracker.
    pub fn tracker(&self) -> &UnresolvedTracker {
        &self.tracker
    }

    /// Resolves one record without touching the run's tracker.
    pub fn evaluate(&self, fields: &RecordFields) -> (RecodeOutputSet, RecordTally) {
        let mut ctx = RecodeContext::new(&self.tables, &self.config, fields);
        resolve_record(&mut ctx);
        ctx.finish()
    }

    /// Resolves one record and adds its tallies to the run.
    pub fn recode(&self, record_number: u64, fields: &RecordFields) -> RecodeOutcome {
        let (codes, tally) = self.evaluate(fields);
        self.tracker.record(record_number, &tally);
        RecodeOutcome {
            record_number,
            codes,
            unresolved: tally.unresolved,
        }
    }

    /// Resolves a batch of records numbered from `first_record_number`.
    ///
    /// Outcomes are returned in input order.
    pub fn recode_batch(&self, first_record_number: u64, records: &[RecordFields]) -> Vec<RecodeOutcome> {
        debug!(records = records.len(), first_record_number, "recoding batch");

        #[cfg(feature = "parallel")]
        let outcomes: Vec<RecodeOutcome> = records
            .par_iter()
            .enumerate()
            .map(|(i, fields)| self.recode(first_record_number + i as u64, fields))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<RecodeOutcome> = records
            .iter()
            .enumerate()
            .map(|(i, fields)| self.recode(first_record_number + i as u64, fields))
            .collect();

        info!(
            records = outcomes.len(),
            unresolved = outcomes.iter().filter(|o| o.unresolved).count(),
            "batch recoded"
        );
        outcomes
    }

    /// Returns the run's unresolved counters.
    pub fn counts(&self) -> UnresolvedCounts {
        self.tracker.snapshot()
    }

    /// Returns true if the record's unresolved bit is set.
    pub fn is_unresolved(&self, record_number: u64) -> bool {
        self.tracker.is_unresolved(record_number)
    }

    /// Clears the tracker for a new run.
    pub fn reset(&self) {
        self.tracker.reset();
    }
}

// =============================================================================
// Resolution Path
// =============================================================================

fn resolve_record(ctx: &mut RecodeContext<'_>) {
    ctx.leukemia = ctx
        .lookup_first(TableId::Leukemia, &[ctx.site, ctx.histology])
        .map(|flag| flag == LEUKEMIA_FLAG)
        .unwrap_or(false);

    let scheme = ctx.field(RecordField::EodCodingSystem);

    if scheme.is_empty() && ctx.year_code < CS_FIRST_YEAR {
        debug!(year = ctx.year, "no coding system, outputs left blank");
        ctx.mark_unresolved();
        return;
    }

    if ctx.is_flagged() {
        resolve_flagged(ctx);
        return;
    }

    if ctx.year_code >= CS_FIRST_YEAR {
        if !ctx.leukemia && ctx.field(RecordField::ReportingSource) == DEATH_CERTIFICATE_ONLY {
            debug!("collaborative stage era death certificate only case");
            ctx.set(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE);
        } else {
            resolve_collaborative_stage(ctx);
        }
        return;
    }

    if scheme == SCHEME_4 {
        resolve_scheme4(ctx);
    } else {
        let recodes = if resolve_patch(ctx) {
            LegacyRecodes::default()
        } else {
            resolve_scheme(ctx, scheme)
        };
        resolve_ajcc(ctx, scheme, &recodes);
    }

    if ctx.year_code <= EARLY_UNSTAGED_LAST_YEAR && ctx.histology == EARLY_UNSTAGED_HISTOLOGY {
        ctx.set(RecodeKind::Historic2000, UNSTAGED_HISTORIC_STAGE);
    }
}

fn resolve_flagged(ctx: &mut RecodeContext<'_>) {
    debug!("record flagged with invalid fields");
    if ctx.year_code < CS_FIRST_YEAR {
        ctx.set(RecodeKind::Ssg2000, UNKNOWN_SUMMARY_STAGE);
        ctx.set(RecodeKind::Ssg77, UNKNOWN_SUMMARY_STAGE);
    }
    ctx.set(RecodeKind::Historic2000, UNKNOWN_HISTORIC_STAGE);
    if ctx.year_code < AJCC_LAST_YEAR_EXCLUSIVE {
        ctx.set(RecodeKind::Pre88Ajcc, UNKNOWN_HISTORIC_STAGE);
    }
    ctx.count_flagged();
    ctx.mark_unresolved();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(year: &str, scheme: &str) -> RecordFields {
        RecordFields::default()
            .with(RecordField::ReportingSource, "1")
            .with(RecordField::YearOfDiagnosis, year)
            .with(RecordField::PrimarySite, "C180")
            .with(RecordField::Histology, "8140")
            .with(RecordField::EodCodingSystem, scheme)
    }

    #[test]
    fn test_blank_scheme_marks_without_counting() {
        let recoder = StageRecoder::new(StageTables::new(), EngineConfig::default());
        let outcome = recoder.recode(5, &make_record("1990", ""));
        assert!(outcome.codes.iter().all(|(_, code)| code.is_empty()));
        assert!(outcome.unresolved);
        assert!(recoder.is_unresolved(5));
        assert_eq!(recoder.counts().historic2000, 0);
    }

    #[test]
    fn test_flagged_record() {
        let recoder = StageRecoder::new(StageTables::new(), EngineConfig::default());
        let outcome = recoder.recode(0, &make_record("1985", "4").with_flagged(true));
        assert_eq!(outcome.codes.get(RecodeKind::Ssg2000), "9");
        assert_eq!(outcome.codes.get(RecodeKind::Ssg77), "9");
        assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "99");
        assert_eq!(outcome.codes.get(RecodeKind::Pre88Ajcc), "99");
        assert!(outcome.unresolved);
        assert_eq!(recoder.counts().flagged_records, 1);

        let outcome = recoder.recode(1, &make_record("2005", "").with_flagged(true));
        assert_eq!(outcome.codes.get(RecodeKind::Ssg2000), "");
        assert_eq!(outcome.codes.get(RecodeKind::Pre88Ajcc), "");
        assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "99");
    }

    #[test]
    fn test_cs_era_death_certificate_only() {
        let mut tables = StageTables::new();
        let recoder = StageRecoder::new(StageTables::new(), EngineConfig::default());
        let record = make_record("2006", "").with(RecordField::ReportingSource, "7");
        let outcome = recoder.recode(0, &record);
        assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "99");
        assert!(!outcome.unresolved);

        tables.insert(TableId::Leukemia, &["180", "8140"], &["1"]).unwrap();
        let recoder = StageRecoder::new(tables, EngineConfig::default());
        let outcome = recoder.recode(0, &record);
        assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "60");
        assert!(outcome.unresolved);
        assert_eq!(recoder.counts().historic2000, 0);
    }

    #[test]
    fn test_early_9140_unstaged() {
        let mut tables = StageTables::new();
        tables
            .insert(TableId::Eod0HistoricStage, &["180", "9140", "", ""], &["10"])
            .unwrap();
        let recoder = StageRecoder::new(tables, EngineConfig::default());
        let record = make_record("1980", "0").with(RecordField::Histology, "9140");
        assert_eq!(recoder.recode(0, &record).codes.get(RecodeKind::Historic2000), "90");

        let record = record.with(RecordField::YearOfDiagnosis, "1983");
        assert_eq!(recoder.recode(1, &record).codes.get(RecodeKind::Historic2000), "90");

        let record = record.with(RecordField::YearOfDiagnosis, "1984");
        assert_eq!(recoder.recode(2, &record).codes.get(RecodeKind::Historic2000), "10");
    }

    #[test]
    fn test_patch_table_skips_scheme_resolver() {
        let mut tables = StageTables::new();
        tables
            .insert(TableId::HistoricStagePatch, &["1", "180", "8140"], &["20"])
            .unwrap();
        let recoder = StageRecoder::new(tables, EngineConfig::default());
        let outcome = recoder.recode(0, &make_record("1980", "0"));
        assert_eq!(outcome.codes.get(RecodeKind::Historic2000), "20");
        assert!(!outcome.unresolved);
    }

    #[test]
    fn test_batch_preserves_order_and_counts() {
        let recoder = StageRecoder::new(StageTables::new(), EngineConfig::default());
        let records: Vec<_> = (0..50)
            .map(|i| make_record("1980", if i % 2 == 0 { "0" } else { "" }))
            .collect();
        let outcomes = recoder.recode_batch(100, &records);

        assert_eq!(outcomes.len(), 50);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.record_number, 100 + i as u64);
            assert!(outcome.unresolved);
        }
        assert_eq!(recoder.counts().historic2000, 25);
        assert_eq!(recoder.counts().unresolved_records, 50);

        recoder.reset();
        assert_eq!(recoder.counts(), UnresolvedCounts::default());
    }

    #[test]
    fn test_evaluate_leaves_tracker_untouched() {
        let recoder = StageRecoder::new(StageTables::new(), EngineConfig::default());
        let (codes, tally) = recoder.evaluate(&make_record("1980", "0"));
        assert_eq!(codes.get(RecodeKind::Historic2000), "99");
        assert!(tally.unresolved);
        assert!(!recoder.is_unresolved(0));
    }
}
