//! Loader-specific types for table file processing.

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::TableId;

/// Errors that can occur while loading lookup tables.
///
/// Every variant is a setup failure; none is produced while resolving a
/// record.
#[derive(Error, Debug)]
pub enum TableError {
    /// I/O error reading a table file.
    #[error("IO error reading table file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Required table files missing from the table directory.
    #[error("Required table files not found: {tables} in {directory}")]
    RequiredTableMissing {
        /// Comma-separated file names of the missing tables.
        tables: String,
        /// The directory that was searched.
        directory: String,
    },

    /// Invalid header - too few columns for the table's key and result arity.
    #[error("Invalid header in {table}: expected at least {expected} columns, found {found}")]
    InvalidHeader {
        /// The table being loaded.
        table: &'static str,
        /// Minimum column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// A row was inserted with the wrong number of key or result values.
    #[error("Row arity mismatch in {table}: expected {expected} {part} values, found {found}")]
    RowArity {
        /// The table being built.
        table: &'static str,
        /// `"key"` or `"result"`.
        part: &'static str,
        /// Expected count.
        expected: usize,
        /// Found count.
        found: usize,
    },
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Configuration for table file parsing.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether to trim surrounding whitespace from every field.
    pub trim: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl LoadConfig {
    /// Creates a config for tab-delimited table files.
    pub fn tab_delimited() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// Statistics from loading one or more table files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of tables loaded.
    pub tables_loaded: usize,
    /// Data rows read from files (blank rows excluded).
    pub total_rows: usize,
    /// Rows stored in the tables.
    pub inserted_rows: usize,
    /// Rows dropped because their key was already present.
    pub duplicate_rows: usize,
    /// Time taken to load in milliseconds.
    pub load_time_ms: u64,
}

impl LoadStats {
    /// Adds another set of statistics into this one.
    pub fn merge(&mut self, other: &LoadStats) {
        self.tables_loaded += other.tables_loaded;
        self.total_rows += other.total_rows;
        self.inserted_rows += other.inserted_rows;
        self.duplicate_rows += other.duplicate_rows;
        self.load_time_ms += other.load_time_ms;
    }
}

/// Discovered table files in a table directory.
#[derive(Debug, Clone, Default)]
pub struct TableFiles {
    /// The directory that was scanned.
    pub directory: PathBuf,
    /// Path of each table file found, by table.
    pub files: BTreeMap<TableId, PathBuf>,
}

impl TableFiles {
    /// Creates an empty file set for a directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            files: BTreeMap::new(),
        }
    }

    /// Returns the path of a table file, if found.
    pub fn path(&self, id: TableId) -> Option<&PathBuf> {
        self.files.get(&id)
    }

    /// Returns true if every catalog table has a file.
    pub fn has_required_files(&self) -> bool {
        TableId::ALL.iter().all(|id| self.files.contains_key(id))
    }

    /// Returns the tables with no file.
    pub fn missing_tables(&self) -> Vec<TableId> {
        TableId::ALL
            .iter()
            .copied()
            .filter(|id| !self.files.contains_key(id))
            .collect()
    }
}
