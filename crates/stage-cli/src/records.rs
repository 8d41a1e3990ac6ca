//! Record input and recode output files.
//!
//! Record files are CSV with a header row. Columns are matched to record
//! fields by name (see [`RecordField::name`]); an optional `flagged` column
//! marks records whose input fields failed upstream validation. Unknown
//! columns are ignored and missing fields read as empty.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use stage_engine::RecodeOutcome;
use stage_types::{RecodeKind, RecordField, RecordFields};
use tracing::{debug, warn};

use crate::{RunError, RunResult};

/// Name of the optional invalid-fields column.
pub const FLAGGED_COLUMN: &str = "flagged";

/// Column names of the recode output file.
pub const OUTPUT_HEADER: [&str; RecodeKind::COUNT + 2] = [
    "record_number",
    "PRE88AJCC",
    "SSG2000",
    "SSG77",
    "HISTORIC2000",
    "PSTSSG2000",
    "PSTSSG77",
    "PSTHISTORIC2000",
    "unresolved",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Field(RecordField),
    Flagged,
    Ignored,
}

fn is_flag_set(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true"
    )
}

// =============================================================================
// Reading
// =============================================================================

/// A streaming reader for one record file.
pub struct RecordReader<R: Read> {
    reader: Reader<R>,
    columns: Vec<Column>,
    record: StringRecord,
    rows_read: usize,
}

impl RecordReader<BufReader<File>> {
    /// Opens a record file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header names no
    /// record field.
    pub fn from_path<P: AsRef<Path>>(path: P) -> RunResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RunError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            RunError::NoFieldColumns { .. } => RunError::NoFieldColumns {
                path: path.display().to_string(),
            },
            other => other,
        })
    }
}

impl<R: Read> RecordReader<R> {
    /// Creates a reader over CSV data with a header row.
    pub fn from_reader(reader: R) -> RunResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::Headers)
            .from_reader(reader);

        let columns: Vec<Column> = reader
            .headers()?
            .iter()
            .map(|name| {
                let name = name.trim_start_matches('\u{feff}');
                if name == FLAGGED_COLUMN {
                    Column::Flagged
                } else if let Some(field) = RecordField::from_name(name) {
                    Column::Field(field)
                } else {
                    debug!(column = name, "ignoring unknown record column");
                    Column::Ignored
                }
            })
            .collect();

        if !columns.iter().any(|c| matches!(c, Column::Field(_))) {
            return Err(RunError::NoFieldColumns {
                path: "<reader>".to_string(),
            });
        }

        Ok(Self {
            reader,
            columns,
            record: StringRecord::new(),
            rows_read: 0,
        })
    }

    /// Returns the number of records read so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Reads all remaining records.
    pub fn read_all(self) -> RunResult<Vec<RecordFields>> {
        self.collect()
    }

    fn convert(&self) -> RecordFields {
        let mut fields = RecordFields::default();
        for (column, value) in self.columns.iter().zip(self.record.iter()) {
            match column {
                Column::Field(field) => fields.set(*field, value),
                Column::Flagged => fields = fields.with_flagged(is_flag_set(value)),
                Column::Ignored => {}
            }
        }
        fields
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = RunResult<RecordFields>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_read += 1;
                Some(Ok(self.convert()))
            }
            Ok(false) => None,
            Err(e) => {
                warn!(row = self.rows_read + 1, error = %e, "malformed record row");
                Some(Err(e.into()))
            }
        }
    }
}

// =============================================================================
// Writing
// =============================================================================

/// Writes outcomes as CSV, one row per record in the given order.
pub fn write_outcomes<W: Write>(writer: W, outcomes: &[RecodeOutcome]) -> RunResult<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(OUTPUT_HEADER)?;

    for outcome in outcomes {
        let record_number = outcome.record_number.to_string();
        let unresolved = if outcome.unresolved { "1" } else { "0" };
        writer.write_record(
            std::iter::once(record_number.as_str())
                .chain(outcome.codes.codes().iter().map(String::as_str))
                .chain(std::iter::once(unresolved)),
        )?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage_types::RecodeOutputSet;

    fn make_outcome(record_number: u64, historic: &str, unresolved: bool) -> RecodeOutcome {
        let mut codes = RecodeOutputSet::new();
        codes.set(RecodeKind::Historic2000, historic);
        RecodeOutcome {
            record_number,
            codes,
            unresolved,
        }
    }

    #[test]
    fn test_output_header_matches_kinds() {
        for (kind, column) in RecodeKind::ALL.iter().zip(&OUTPUT_HEADER[1..]) {
            assert_eq!(kind.name(), *column);
        }
    }

    #[test]
    fn test_read_by_column_name() {
        let data = "\
histology,primary_site,notes,year_of_diagnosis,flagged
8140,C180,first,1985,0
9650,C619,second,1990,yes
";
        let records = RecordReader::from_reader(data.as_bytes())
            .unwrap()
            .read_all()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(RecordField::Histology), "8140");
        assert_eq!(records[0].get(RecordField::PrimarySite), "C180");
        assert_eq!(records[0].get(RecordField::YearOfDiagnosis), "1985");
        assert_eq!(records[0].get(RecordField::CsSchema), "");
        assert!(!records[0].is_flagged());
        assert!(records[1].is_flagged());
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let data = "extension,nodes\n 10,0\n";
        let records = RecordReader::from_reader(data.as_bytes())
            .unwrap()
            .read_all()
            .unwrap();
        assert_eq!(records[0].get(RecordField::Extension), " 10");
    }

    #[test]
    fn test_header_without_fields() {
        let data = "a,b\n1,2\n";
        assert!(matches!(
            RecordReader::from_reader(data.as_bytes()),
            Err(RunError::NoFieldColumns { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let data = "histology,primary_site\n8140\n";
        let mut reader = RecordReader::from_reader(data.as_bytes()).unwrap();
        assert!(matches!(reader.next(), Some(Err(RunError::Csv(_)))));
    }

    #[test]
    fn test_write_outcomes() {
        let mut buffer = Vec::new();
        write_outcomes(
            &mut buffer,
            &[make_outcome(0, "20", false), make_outcome(1, "99", true)],
        )
        .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "record_number,PRE88AJCC,SSG2000,SSG77,HISTORIC2000,PSTSSG2000,PSTSSG77,PSTHISTORIC2000,unresolved"
        );
        assert_eq!(lines[1], "0,,,,20,,,,0");
        assert_eq!(lines[2], "1,,,,99,,,,1");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RecordReader::from_path(dir.path().join("absent.csv")),
            Err(RunError::FileNotFound { .. })
        ));
    }
}
