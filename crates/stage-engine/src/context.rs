//! Per-record resolution state.

use stage_tables::{LookupError, StageTables, TableId};
use stage_types::{RecodeKind, RecodeOutputSet, RecordField, RecordFields};
use tracing::{trace, warn};

use crate::derive::{atoi, site_numeric};
use crate::recoder::EngineConfig;
use crate::tracker::RecordTally;

/// Everything a resolver needs for one record: the shared tables, the
/// record's fields and derived keys, and the outputs and tallies being built.
pub(crate) struct RecodeContext<'a> {
    tables: &'a StageTables,
    config: &'a EngineConfig,
    fields: &'a RecordFields,
    /// Numeric part of the primary site (`C619` gives `619`).
    pub site: &'a str,
    pub site_code: i64,
    pub histology: &'a str,
    pub histology_code: i64,
    pub year: &'a str,
    pub year_code: i64,
    pub leukemia: bool,
    output: RecodeOutputSet,
    tally: RecordTally,
}

impl<'a> RecodeContext<'a> {
    pub fn new(tables: &'a StageTables, config: &'a EngineConfig, fields: &'a RecordFields) -> Self {
        let site = site_numeric(fields.get(RecordField::PrimarySite));
        let histology = fields.get(RecordField::Histology);
        let year = fields.get(RecordField::YearOfDiagnosis);
        Self {
            tables,
            config,
            fields,
            site,
            site_code: atoi(site),
            histology,
            histology_code: atoi(histology),
            year,
            year_code: atoi(year),
            leukemia: false,
            output: RecodeOutputSet::new(),
            tally: RecordTally::default(),
        }
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Raw value of a record field.
    pub fn field(&self, field: RecordField) -> &'a str {
        self.fields.get(field)
    }

    pub fn is_flagged(&self) -> bool {
        self.fields.is_flagged()
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    pub fn get(&self, kind: RecodeKind) -> &str {
        self.output.get(kind)
    }

    pub fn set(&mut self, kind: RecodeKind, code: impl Into<String>) {
        self.output.set(kind, code);
    }

    pub fn clear(&mut self, kind: RecodeKind) {
        self.output.clear(kind);
    }

    /// Sets a sentinel code, counts the failure and marks the record.
    pub fn unresolved(&mut self, kind: RecodeKind, sentinel: &str) {
        self.output.set(kind, sentinel);
        self.tally.count(kind);
        self.tally.unresolved = true;
    }

    /// Marks the record without counting against any output.
    pub fn mark_unresolved(&mut self) {
        self.tally.unresolved = true;
    }

    pub fn count_flagged(&mut self) {
        self.tally.flagged += 1;
    }

    pub fn finish(self) -> (RecodeOutputSet, RecordTally) {
        (self.output, self.tally)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Looks up all result values of a table row.
    pub fn lookup<S: AsRef<str> + std::fmt::Debug>(
        &self,
        table: TableId,
        key: &[S],
    ) -> Result<&'a [String], LookupError> {
        let result = self.tables.lookup(table, key);
        match &result {
            Ok(values) => trace!(table = table.name(), ?key, ?values, "lookup matched"),
            Err(LookupError::NoMatch { .. }) => trace!(table = table.name(), ?key, "lookup missed"),
            Err(e) => warn!(error = %e, ?key, "lookup rejected"),
        }
        result
    }

    /// Looks up the first result value of a table row.
    pub fn lookup_first<S: AsRef<str> + std::fmt::Debug>(
        &self,
        table: TableId,
        key: &[S],
    ) -> Result<&'a str, LookupError> {
        self.lookup(table, key)?
            .first()
            .map(String::as_str)
            .ok_or(LookupError::NoMatch { table: table.name() })
    }

    /// Looks up the first three result values of a table row.
    pub fn lookup_triple<S: AsRef<str> + std::fmt::Debug>(
        &self,
        table: TableId,
        key: &[S],
    ) -> Result<[String; 3], LookupError> {
        match self.lookup(table, key)? {
            [a, b, c, ..] => Ok([a.clone(), b.clone(), c.clone()]),
            _ => Err(LookupError::NoMatch { table: table.name() }),
        }
    }

    pub fn tables(&self) -> &'a StageTables {
        self.tables
    }
}
