//! One end-to-end recode run.

use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use serde::Serialize;
use stage_engine::{StageRecoder, UnresolvedCounts};
use stage_tables::{discover_table_files, StageTables};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::records::{write_outcomes, RecordReader};
use crate::RunResult;

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Table rows loaded.
    pub table_rows: usize,
    /// Records read and recoded.
    pub records: usize,
    /// Unresolved counters at the end of the run.
    pub unresolved: UnresolvedCounts,
    /// Wall time of the run in milliseconds.
    pub elapsed_ms: u64,
}

/// Runs a recode: load tables, read records, recode, write results.
///
/// Any setup failure aborts before a record is resolved.
pub fn run(config: &RunConfig) -> RunResult<RunSummary> {
    let start = Instant::now();

    info!(path = %config.tables_path.display(), "loading stage recode tables");
    let files = discover_table_files(&config.tables_path)?;
    let mut tables = StageTables::new();
    let stats = tables.load_all_parallel(&files)?;
    if stats.duplicate_rows > 0 {
        warn!(duplicates = stats.duplicate_rows, "duplicate table keys ignored");
    }
    for id in tables.empty_tables() {
        warn!(table = id.name(), "table has no rows");
    }

    info!(path = %config.input_path.display(), "reading records");
    let records = RecordReader::from_path(&config.input_path)?.read_all()?;

    let recoder = StageRecoder::new(tables, config.engine);
    let outcomes = recoder.recode_batch(0, &records);

    let output = File::create(&config.output_path)?;
    write_outcomes(BufWriter::new(output), &outcomes)?;
    info!(path = %config.output_path.display(), records = outcomes.len(), "wrote recodes");

    let summary = RunSummary {
        table_rows: recoder.tables().total_rows(),
        records: records.len(),
        unresolved: recoder.counts(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    if let Some(path) = &config.summary_path {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)?;
        info!(path = %path.display(), "wrote run summary");
    }

    let counts = &summary.unresolved;
    info!(
        records = summary.records,
        unresolved_records = counts.unresolved_records,
        flagged_records = counts.flagged_records,
        pre88_ajcc = counts.pre88_ajcc,
        ssg2000 = counts.ssg2000,
        ssg77 = counts.ssg77,
        historic2000 = counts.historic2000,
        pst_ssg2000 = counts.pst_ssg2000,
        pst_ssg77 = counts.pst_ssg77,
        pst_historic2000 = counts.pst_historic2000,
        elapsed_ms = summary.elapsed_ms,
        "recode run complete"
    );

    Ok(summary)
}
