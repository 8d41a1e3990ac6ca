//! # stage-tables
//!
//! Loader and in-memory store for the lookup tables consulted by the stage
//! recode engine.
//!
//! Each table is a keyed decision table: an ordered tuple of string keys maps
//! to one or more result values. Tables are read from one CSV file each,
//! built once during setup and never mutated afterwards.
//!
//! ## Features
//!
//! - `parallel` (default): Enables parallel table loading via rayon.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stage_tables::{discover_table_files, StageTables, TableId};
//!
//! let files = discover_table_files("./tables")?;
//! let mut tables = StageTables::new();
//! tables.load_all(&files)?;
//!
//! match tables.lookup_first(TableId::Leukemia, &["420", "9823"]) {
//!     Ok(flag) => println!("leukemia flag {flag}"),
//!     Err(e) => println!("{e}"),
//! }
//! # Ok::<(), stage_tables::TableError>(())
//! ```

#![warn(missing_docs)]

mod catalog;
mod loader;
mod parser;
mod store;
mod table;
mod types;

pub use catalog::TableId;
pub use loader::discover_table_files;
pub use parser::{TableParser, TableRow};
pub use store::StageTables;
pub use table::{LookupError, LookupTable};
pub use types::{LoadConfig, LoadStats, TableError, TableFiles, TableResult};
