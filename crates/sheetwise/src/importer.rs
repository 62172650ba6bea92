//! CSV to table import pipeline.
//!
//! Parse, infer, resolve the target name, then create and populate the table
//! in one transaction. The caller renders the returned [`ImportReport`].

use std::path::{Path, PathBuf};

use sheetwise_db::{ColumnDescriptor, QueryResult, Store};
use tracing::info;

use crate::conflict::{resolve_table_name, ConflictDecider, Resolution};
use crate::error::{Operation, SessionError};
use crate::tabular::TabularData;
use crate::type_mapper::{coerce_rows, infer_columns};

/// Rows read back after an import.
pub const PREVIEW_ROWS: usize = 5;

/// What to import and where.
#[derive(Debug, Clone, Copy)]
pub struct ImportRequest<'a> {
    pub source: &'a Path,
    pub table: &'a str,
    /// Overrides the extension-based delimiter.
    pub delimiter: Option<u8>,
}

impl<'a> ImportRequest<'a> {
    pub fn new(source: &'a Path, table: &'a str) -> Self {
        Self {
            source,
            table,
            delimiter: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Receipt for a completed import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Final table name, after any rename.
    pub table: String,
    pub source: PathBuf,
    pub columns: Vec<ColumnDescriptor>,
    pub rows_inserted: usize,
    /// True if an existing table was overwritten.
    pub replaced: bool,
    /// Up to [`PREVIEW_ROWS`] rows read back from the new table.
    pub preview: QueryResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported(ImportReport),
    /// The user chose not to touch an existing table.
    Skipped { requested: String },
}

/// Import one delimited file into the store.
///
/// The file is parsed before the store is touched, so a malformed file never
/// leaves a partial table behind.
pub fn import_file(
    store: &mut Store,
    request: ImportRequest<'_>,
    decider: &mut dyn ConflictDecider,
) -> Result<ImportOutcome, SessionError> {
    let data = TabularData::from_path(request.source, request.delimiter)
        .map_err(|e| SessionError::parse(request.source, e))?;
    let columns = infer_columns(&data);
    info!(
        source = %request.source.display(),
        columns = data.column_count(),
        rows = data.row_count(),
        "Parsed tabular source"
    );

    let resolution = resolve_table_name(store, request.table, decider)?;
    let table = match resolution.table_name() {
        Some(name) => name.to_string(),
        None => {
            return Ok(ImportOutcome::Skipped {
                requested: request.table.to_string(),
            })
        }
    };

    let import_failed = |source| {
        SessionError::execution(
            Operation::Import {
                table: table.clone(),
            },
            source,
        )
    };

    let rows = coerce_rows(&data, &columns);
    let rows_inserted = store
        .create_table(&table, &columns, &rows, resolution.create_mode())
        .map_err(import_failed)?;
    let preview = store.preview(&table, PREVIEW_ROWS).map_err(import_failed)?;

    Ok(ImportOutcome::Imported(ImportReport {
        replaced: matches!(resolution, Resolution::Replace(_)),
        table,
        source: request.source.to_path_buf(),
        columns,
        rows_inserted,
        preview,
    }))
}
