//! # stage-cli
//!
//! Batch recoding of SEER record files.
//!
//! A run loads every lookup table from a table directory, reads a CSV of
//! records by column name, recodes them through
//! [`StageRecoder`](stage_engine::StageRecoder) and writes one CSV row of
//! codes per record, plus an optional JSON summary of the unresolved
//! counters. Configuration comes from environment variables; see
//! [`RunConfig`].

#![warn(missing_docs)]

pub mod config;
pub mod records;
mod runner;

use thiserror::Error;

pub use config::{ConfigError, RunConfig};
pub use records::{write_outcomes, RecordReader, OUTPUT_HEADER};
pub use runner::{run, RunSummary};

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Table discovery or loading failed.
    #[error("Table setup failed: {0}")]
    Tables(#[from] stage_tables::TableError),

    /// Reading or writing a record file failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the JSON summary failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input file not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The record file header names no record field.
    #[error("No record field columns in header of {path}")]
    NoFieldColumns {
        /// The record file.
        path: String,
    },
}

/// Result type for run operations.
pub type RunResult<T> = Result<T, RunError>;
