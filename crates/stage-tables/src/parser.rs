//! Table file parser.
//!
//! Provides a streaming parser for delimited lookup table files. The first
//! `key_arity` columns of a row are the key, the remaining columns are the
//! result values.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::catalog::TableId;
use crate::types::{LoadConfig, TableError, TableResult};

/// One parsed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Key values, `key_arity` of them.
    pub keys: Vec<String>,
    /// Result values, at least `result_arity` of them.
    pub results: Vec<String>,
}

/// A streaming parser for one table file.
///
/// Rows are read one at a time; blank rows are skipped.
pub struct TableParser<R: Read> {
    reader: Reader<R>,
    table: TableId,
    rows_read: usize,
}

impl TableParser<BufReader<File>> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has too few columns.
    pub fn from_path<P: AsRef<Path>>(path: P, table: TableId, config: &LoadConfig) -> TableResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TableError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), table, config)
    }
}

impl<R: Read> TableParser<R> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R, table: TableId, config: &LoadConfig) -> TableResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(true)
            .flexible(false)
            .trim(if config.trim { Trim::All } else { Trim::None })
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader, table)?;

        Ok(Self {
            reader: csv_reader,
            table,
            rows_read: 0,
        })
    }

    /// Validates that the header carries enough key and result columns.
    fn validate_headers(reader: &mut Reader<R>, table: TableId) -> TableResult<()> {
        let headers = reader.headers()?;
        let expected = table.key_arity() + table.result_arity();

        // A lone BOM is not a column
        let found = match headers.len() {
            1 if headers
                .get(0)
                .map(|h| h.trim_start_matches('\u{feff}').is_empty())
                .unwrap_or(true) =>
            {
                0
            }
            n => n,
        };

        if found < expected {
            return Err(TableError::InvalidHeader {
                table: table.name(),
                expected,
                found,
            });
        }

        Ok(())
    }

    /// Returns the table this parser reads.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Returns the number of non-blank rows read so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Parses all rows into a Vec.
    ///
    /// Stops at the first malformed row.
    pub fn parse_all(self) -> TableResult<Vec<TableRow>> {
        self.collect()
    }

    fn split(&self, record: &StringRecord) -> TableRow {
        let key_arity = self.table.key_arity();
        TableRow {
            keys: record.iter().take(key_arity).map(str::to_string).collect(),
            results: record.iter().skip(key_arity).map(str::to_string).collect(),
        }
    }
}

impl<R: Read> Iterator for TableParser<R> {
    type Item = TableResult<TableRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    // Skip empty records
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    self.rows_read += 1;
                    return Some(Ok(self.split(&record)));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
