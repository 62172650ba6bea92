//! The store: one SQLite connection holding every imported table.

use rusqlite::{params, params_from_iter, Batch, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{DbError, Result};
use crate::sql::{create_table_sql, drop_table_sql, insert_sql, preview_sql, validate_identifier};
use crate::types::{ColumnDescriptor, ColumnInfo, QueryResult, Value};

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "my_database.db";

/// What to do with an existing table of the same name when creating one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Fail if the table already exists.
    New,
    /// Drop any existing table first, in the same transaction.
    Replace,
}

/// Collection of all tables, identified by name.
///
/// Owns the only connection to the database file. Not shared across threads.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Database opened");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// File backing this store, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check whether a table exists. SQLite table names are case-insensitive.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// All user table names, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Columns of an existing table in storage order.
    pub fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map(params![table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(DbError::not_found(table));
        }
        Ok(columns)
    }

    /// Drop a table if it exists.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        self.conn.execute(&drop_table_sql(table), [])?;
        info!(table, "Table dropped");
        Ok(())
    }

    /// Create a table and append every row in one transaction.
    ///
    /// On any failure nothing is committed: with [`CreateMode::Replace`] the
    /// previous table survives untouched. Returns the number of rows inserted.
    pub fn create_table(
        &mut self,
        table: &str,
        columns: &[ColumnDescriptor],
        rows: &[Vec<Value>],
        mode: CreateMode,
    ) -> Result<usize> {
        validate_identifier(table)?;
        for column in columns {
            validate_identifier(&column.name)?;
        }

        let create = create_table_sql(table, columns);
        let insert = insert_sql(table, columns);
        debug!(sql = %create, "Creating table");

        let tx = self.conn.transaction()?;
        if mode == CreateMode::Replace {
            tx.execute(&drop_table_sql(table), [])?;
        }
        tx.execute(&create, [])?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for (idx, row) in rows.iter().enumerate() {
                if row.len() != columns.len() {
                    return Err(DbError::RowWidth {
                        row: idx + 1,
                        expected: columns.len(),
                        actual: row.len(),
                    });
                }
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        info!(table, columns = columns.len(), rows = rows.len(), ?mode, "Table created");
        Ok(rows.len())
    }

    /// First `limit` rows of a table.
    pub fn preview(&self, table: &str, limit: usize) -> Result<QueryResult> {
        self.execute(&preview_sql(table, limit))
    }

    /// Execute one SQL statement verbatim.
    ///
    /// Row-producing statements return their rows; anything else reports the
    /// number of changed rows. Input holding only whitespace or comments is a
    /// no-op. More than one statement is rejected before anything runs.
    pub fn execute(&self, sql: &str) -> Result<QueryResult> {
        let sql = sql.trim();
        debug!(sql, "Executing statement");

        let mut batch = Batch::new(&self.conn, sql);
        let Some(mut stmt) = batch.next()? else {
            return Ok(QueryResult::default());
        };
        // A tail that fails to prepare is still a second statement.
        if !matches!(batch.next(), Ok(None)) {
            return Err(DbError::MultipleStatements);
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        if columns.is_empty() {
            let changes = stmt.execute([])?;
            return Ok(QueryResult {
                changes,
                ..QueryResult::default()
            });
        }

        let width = columns.len();
        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(Value::read(row, idx)?);
            }
            rows.push(values);
        }

        Ok(QueryResult {
            columns,
            rows,
            changes: 0,
        })
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, err)| DbError::from(err))?;
        if let Some(path) = path {
            info!(path = %path.display(), "Database closed");
        }
        Ok(())
    }
}
