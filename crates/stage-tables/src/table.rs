//! Exact-key lookup table.

use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::TableId;
use crate::types::{TableError, TableResult};

/// Why a lookup produced no result.
///
/// `NoMatch` is an expected outcome for many legitimate records; every
/// caller decides its own fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No row has the given key.
    #[error("no match in {table}")]
    NoMatch {
        /// The table that was queried.
        table: &'static str,
    },

    /// The key has the wrong number of values for the table.
    #[error("{table} expects {expected} key values, got {found}")]
    KeyArity {
        /// The table that was queried.
        table: &'static str,
        /// Declared key arity.
        expected: usize,
        /// Supplied key length.
        found: usize,
    },
}

impl LookupError {
    /// Returns true for the `NoMatch` outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

/// A read-only decision table mapping an ordered key tuple to result values.
///
/// Lookups are exact-key; ranges must be resolved by the caller before the
/// call.
#[derive(Clone)]
pub struct LookupTable {
    id: TableId,
    rows: HashMap<Vec<String>, Vec<String>>,
    duplicates: usize,
}

impl std::fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTable")
            .field("id", &self.id)
            .field("rows", &self.rows.len())
            .field("duplicates", &self.duplicates)
            .finish()
    }
}

impl LookupTable {
    /// Creates an empty table.
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            rows: HashMap::new(),
            duplicates: 0,
        }
    }

    /// Creates an empty table with pre-allocated capacity.
    pub fn with_capacity(id: TableId, capacity: usize) -> Self {
        Self {
            id,
            rows: HashMap::with_capacity(capacity),
            duplicates: 0,
        }
    }

    /// Returns the table identity.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the declared key arity.
    pub fn query_arity(&self) -> usize {
        self.id.key_arity()
    }

    /// Inserts a row.
    ///
    /// Returns `Ok(false)` if the key was already present; the first row wins.
    ///
    /// # Errors
    /// Returns an error if the key or result arity does not match the catalog.
    pub fn insert(&mut self, keys: Vec<String>, results: Vec<String>) -> TableResult<bool> {
        if keys.len() != self.id.key_arity() {
            return Err(TableError::RowArity {
                table: self.id.name(),
                part: "key",
                expected: self.id.key_arity(),
                found: keys.len(),
            });
        }
        if results.len() < self.id.result_arity() {
            return Err(TableError::RowArity {
                table: self.id.name(),
                part: "result",
                expected: self.id.result_arity(),
                found: results.len(),
            });
        }

        if self.rows.contains_key(&keys) {
            self.duplicates += 1;
            return Ok(false);
        }
        self.rows.insert(keys, results);
        Ok(true)
    }

    /// Looks up the result values for an ordered key.
    pub fn lookup<S: AsRef<str>>(&self, key: &[S]) -> Result<&[String], LookupError> {
        if key.len() != self.id.key_arity() {
            return Err(LookupError::KeyArity {
                table: self.id.name(),
                expected: self.id.key_arity(),
                found: key.len(),
            });
        }

        let owned: Vec<String> = key.iter().map(|k| k.as_ref().to_string()).collect();
        self.rows
            .get(&owned)
            .map(Vec::as_slice)
            .ok_or(LookupError::NoMatch {
                table: self.id.name(),
            })
    }

    /// Looks up the first result value for an ordered key.
    pub fn lookup_first<S: AsRef<str>>(&self, key: &[S]) -> Result<&str, LookupError> {
        self.lookup(key)
            .map(|results| results.first().map(String::as_str).unwrap_or(""))
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows dropped as duplicate keys.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = LookupTable::new(TableId::Stage);
        assert!(table.insert(make_row(&["1", "0"]), make_row(&["10"])).unwrap());

        assert_eq!(table.lookup(&["1", "0"]).unwrap(), &["10".to_string()]);
        assert_eq!(table.lookup_first(&["1", "0"]).unwrap(), "10");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_no_match() {
        let table = LookupTable::new(TableId::Stage);
        let err = table.lookup(&["1", "0"]).unwrap_err();
        assert!(err.is_no_match());
        assert_eq!(err.to_string(), "no match in LRD Stage");
    }

    #[test]
    fn test_key_arity_mismatch() {
        let table = LookupTable::new(TableId::Stage);
        let err = table.lookup(&["1"]).unwrap_err();
        assert_eq!(
            err,
            LookupError::KeyArity {
                table: "LRD Stage",
                expected: 2,
                found: 1
            }
        );
        assert!(!err.is_no_match());
    }

    #[test]
    fn test_first_row_wins() {
        let mut table = LookupTable::new(TableId::Leukemia);
        table.insert(make_row(&["420", "9823"]), make_row(&["1"])).unwrap();
        let inserted = table
            .insert(make_row(&["420", "9823"]), make_row(&["0"]))
            .unwrap();

        assert!(!inserted);
        assert_eq!(table.duplicate_count(), 1);
        assert_eq!(table.lookup_first(&["420", "9823"]).unwrap(), "1");
    }

    #[test]
    fn test_insert_rejects_bad_arity() {
        let mut table = LookupTable::new(TableId::Nodes2000);
        assert!(table
            .insert(make_row(&["619", "8140", "0"]), make_row(&["1"]))
            .is_err());
        assert!(table
            .insert(make_row(&["619", "8140"]), make_row(&["1", "1", "1"]))
            .is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_exact_key_only() {
        let mut table = LookupTable::new(TableId::Eod0Ajcc);
        table.insert(make_row(&["1", "5"]), make_row(&["20"])).unwrap();
        assert!(table.lookup(&["1", "50"]).is_err());
        assert!(table.lookup(&["01", "5"]).is_err());
    }
}
