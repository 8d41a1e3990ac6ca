//! In-memory store of all stage recode lookup tables.
//!
//! Tables are loaded once during setup and are read-only afterwards, so a
//! `StageTables` can be shared across threads by reference.
//! Includes parallel loading support via rayon.
//!
//! ```ignore
//! let files = discover_table_files("/path/to/tables")?;
//! let mut tables = StageTables::new();
//! tables.load_all(&files)?;
//!
//! let leukemia = tables.lookup(TableId::Leukemia, &["420", "9823"]);
//! ```

use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::TableId;
use crate::parser::{TableParser, TableRow};
use crate::table::{LookupError, LookupTable};
use crate::types::{LoadConfig, LoadStats, TableFiles, TableResult};

/// In-memory store holding every catalog table.
///
/// # Example
///
/// ```
/// use stage_tables::{StageTables, TableId};
///
/// let mut tables = StageTables::new();
/// tables
///     .insert(TableId::Leukemia, &["420", "9823"], &["1"])
///     .unwrap();
///
/// assert_eq!(tables.lookup_first(TableId::Leukemia, &["420", "9823"]).unwrap(), "1");
/// assert!(tables.lookup(TableId::Leukemia, &["420", "8140"]).is_err());
/// ```
pub struct StageTables {
    tables: Vec<LookupTable>,
}

impl Default for StageTables {
    fn default() -> Self {
        Self {
            tables: TableId::ALL.iter().map(|id| LookupTable::new(*id)).collect(),
        }
    }
}

impl std::fmt::Debug for StageTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("StageTables");
        for table in &self.tables {
            debug.field(table.id().file_stem(), &table.len());
        }
        debug.finish()
    }
}

impl StageTables {
    /// Creates a store with every catalog table present and empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a table.
    pub fn table(&self, id: TableId) -> &LookupTable {
        &self.tables[id.index()]
    }

    /// Inserts one row into a table.
    ///
    /// Returns `Ok(false)` if the key was already present.
    pub fn insert<K, V>(&mut self, id: TableId, keys: &[K], results: &[V]) -> TableResult<bool>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.tables[id.index()].insert(
            keys.iter().map(|k| k.as_ref().to_string()).collect(),
            results.iter().map(|v| v.as_ref().to_string()).collect(),
        )
    }

    /// Looks up the result values for an ordered key.
    pub fn lookup<S: AsRef<str>>(&self, id: TableId, key: &[S]) -> Result<&[String], LookupError> {
        self.table(id).lookup(key)
    }

    /// Looks up the first result value for an ordered key.
    pub fn lookup_first<S: AsRef<str>>(&self, id: TableId, key: &[S]) -> Result<&str, LookupError> {
        self.table(id).lookup_first(key)
    }

    /// Loads one table from a file.
    pub fn load_table<P: AsRef<Path>>(
        &mut self,
        id: TableId,
        path: P,
        config: &LoadConfig,
    ) -> TableResult<LoadStats> {
        let start = Instant::now();
        let rows = TableParser::from_path(path, id, config)?.parse_all()?;
        let mut stats = self.store_rows(id, rows)?;
        stats.load_time_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Loads every table from a discovered file set, one after another.
    pub fn load_all(&mut self, files: &TableFiles) -> TableResult<LoadStats> {
        self.load_all_with_config(files, &LoadConfig::default())
    }

    /// Loads every table from a discovered file set with a parse config.
    pub fn load_all_with_config(
        &mut self,
        files: &TableFiles,
        config: &LoadConfig,
    ) -> TableResult<LoadStats> {
        let start = Instant::now();
        let mut total = LoadStats::default();

        for (id, path) in &files.files {
            let stats = self.load_table(*id, path, config)?;
            debug!(table = id.name(), rows = stats.inserted_rows, "loaded table");
            total.merge(&stats);
        }

        total.load_time_ms = start.elapsed().as_millis() as u64;
        info!(
            tables = total.tables_loaded,
            rows = total.inserted_rows,
            duplicates = total.duplicate_rows,
            "loaded stage recode tables"
        );
        Ok(total)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PARALLEL LOADING (requires "parallel" feature)
    // ═══════════════════════════════════════════════════════════════════════════

    /// Loads every table from a discovered file set, parsing files in parallel.
    ///
    /// Parsing runs concurrently across files; rows are inserted afterwards
    /// in catalog order, so the result is identical to [`load_all`](Self::load_all).
    #[cfg(feature = "parallel")]
    pub fn load_all_parallel(&mut self, files: &TableFiles) -> TableResult<LoadStats> {
        let start = Instant::now();
        let config = LoadConfig::default();
        let entries: Vec<(TableId, &Path)> = files
            .files
            .iter()
            .map(|(id, path)| (*id, path.as_path()))
            .collect();

        let parsed: Vec<(TableId, Vec<TableRow>)> = entries
            .par_iter()
            .map(|(id, path)| {
                TableParser::from_path(path, *id, &config)
                    .and_then(TableParser::parse_all)
                    .map(|rows| (*id, rows))
            })
            .collect::<TableResult<_>>()?;

        let mut total = LoadStats::default();
        for (id, rows) in parsed {
            let stats = self.store_rows(id, rows)?;
            debug!(table = id.name(), rows = stats.inserted_rows, "loaded table");
            total.merge(&stats);
        }

        total.load_time_ms = start.elapsed().as_millis() as u64;
        info!(
            tables = total.tables_loaded,
            rows = total.inserted_rows,
            duplicates = total.duplicate_rows,
            "loaded stage recode tables in parallel"
        );
        Ok(total)
    }

    fn store_rows(&mut self, id: TableId, rows: Vec<TableRow>) -> TableResult<LoadStats> {
        let table = &mut self.tables[id.index()];
        let mut stats = LoadStats {
            tables_loaded: 1,
            ..Default::default()
        };

        for row in rows {
            stats.total_rows += 1;
            if table.insert(row.keys, row.results)? {
                stats.inserted_rows += 1;
            } else {
                stats.duplicate_rows += 1;
            }
        }

        Ok(stats)
    }

    /// Returns the number of rows in a table.
    pub fn row_count(&self, id: TableId) -> usize {
        self.table(id).len()
    }

    /// Returns the total number of rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(LookupTable::len).sum()
    }

    /// Returns the tables that have no rows.
    pub fn empty_tables(&self) -> Vec<TableId> {
        self.tables
            .iter()
            .filter(|t| t.is_empty())
            .map(LookupTable::id)
            .collect()
    }
}
