//! Table file discovery.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::catalog::TableId;
use crate::types::{TableError, TableFiles, TableResult};

/// Discovers the table files in a table directory.
///
/// Each catalog table is expected as `<file_stem>.csv` directly inside the
/// directory. Files that match no catalog table are ignored. All missing
/// tables are reported in a single error.
pub fn discover_table_files<P: AsRef<Path>>(path: P) -> TableResult<TableFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(TableError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut files = TableFiles::new(path);

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();

        if entry_path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        let Some(stem) = entry_path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        match TableId::from_file_stem(stem) {
            Some(id) => {
                files.files.insert(id, entry_path.clone());
            }
            None => debug!(file = %entry_path.display(), "ignoring unrecognized table file"),
        }
    }

    if !files.has_required_files() {
        let missing: Vec<String> = files
            .missing_tables()
            .into_iter()
            .map(TableId::file_name)
            .collect();
        return Err(TableError::RequiredTableMissing {
            tables: missing.join(", "),
            directory: path.display().to_string(),
        });
    }

    Ok(files)
}
