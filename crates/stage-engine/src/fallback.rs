//! Ordered fallback lookups.
//!
//! A chain is a list of (table, key) steps tried in order until one
//! matches. Only `NoMatch` and key arity errors are possible per step; both
//! move on to the next step.

use stage_tables::{LookupError, StageTables, TableId};
use tracing::{trace, warn};

/// One lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupStep {
    /// Table to query.
    pub table: TableId,
    /// Ordered key values.
    pub key: Vec<String>,
}

/// A successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'t> {
    /// The table that matched.
    pub table: TableId,
    /// Its first result value.
    pub value: &'t str,
}

/// An ordered list of lookup attempts; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct FallbackChain {
    steps: Vec<LookupStep>,
}

impl FallbackChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn then<I, S>(mut self, table: TableId, key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(LookupStep {
            table,
            key: key.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Returns the steps in attempt order.
    pub fn steps(&self) -> &[LookupStep] {
        &self.steps
    }

    /// Returns true if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Tries each step in order and returns the first match.
    pub fn resolve<'t>(&self, tables: &'t StageTables) -> Option<Resolved<'t>> {
        for step in &self.steps {
            match tables.lookup_first(step.table, step.key.as_slice()) {
                Ok(value) => {
                    trace!(table = step.table.name(), key = ?step.key, value, "fallback step matched");
                    return Some(Resolved {
                        table: step.table,
                        value,
                    });
                }
                Err(LookupError::NoMatch { .. }) => {
                    trace!(table = step.table.name(), key = ?step.key, "fallback step missed");
                }
                Err(e) => warn!(error = %e, "fallback step rejected"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tables() -> StageTables {
        let mut tables = StageTables::new();
        tables
            .insert(TableId::Eod1HistoricStageDirect, &["180", "8140", "1", "2"], &["10"])
            .unwrap();
        tables
            .insert(TableId::Eod1HistoricStageFromExtNodes, &["180", "8140", "3", "0"], &["20"])
            .unwrap();
        tables
    }

    #[test]
    fn test_first_match_wins() {
        let tables = make_tables();
        let chain = FallbackChain::new()
            .then(TableId::Eod1HistoricStageDirect, ["180", "8140", "1", "2"])
            .then(TableId::Eod1HistoricStageFromExtNodes, ["180", "8140", "3", "0"]);

        let resolved = chain.resolve(&tables).unwrap();
        assert_eq!(resolved.table, TableId::Eod1HistoricStageDirect);
        assert_eq!(resolved.value, "10");
    }

    #[test]
    fn test_falls_through_to_later_step() {
        let tables = make_tables();
        let chain = FallbackChain::new()
            .then(TableId::Eod1HistoricStageDirect, ["180", "8140", "9", "9"])
            .then(TableId::Eod1HistoricStageFromExtNodes, ["180", "8140", "3", "0"]);

        let resolved = chain.resolve(&tables).unwrap();
        assert_eq!(resolved.table, TableId::Eod1HistoricStageFromExtNodes);
        assert_eq!(resolved.value, "20");
    }

    #[test]
    fn test_exhausted_chain() {
        let tables = make_tables();
        let chain = FallbackChain::new()
            .then(TableId::Eod1HistoricStageDirect, ["180", "8140", "9", "9"]);
        assert!(chain.resolve(&tables).is_none());
        assert!(FallbackChain::new().resolve(&tables).is_none());
    }

    #[test]
    fn test_key_arity_mismatch_is_skipped() {
        let tables = make_tables();
        let chain = FallbackChain::new()
            .then(TableId::Eod1HistoricStageDirect, ["180"])
            .then(TableId::Eod1HistoricStageFromExtNodes, ["180", "8140", "3", "0"]);
        assert_eq!(chain.resolve(&tables).unwrap().value, "20");
    }

    #[test]
    fn test_steps_are_recorded_in_order() {
        let chain = FallbackChain::new()
            .then(TableId::Eod0Ajcc, ["1", "2"])
            .then(TableId::Eod1To3Ajcc, ["180", "1", "0"]);
        let tables: Vec<_> = chain.steps().iter().map(|s| s.table).collect();
        assert_eq!(tables, vec![TableId::Eod0Ajcc, TableId::Eod1To3Ajcc]);
        assert_eq!(chain.steps()[0].key, vec!["1", "2"]);
    }
}
