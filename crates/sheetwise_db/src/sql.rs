//! Identifier quoting and statement builders.
//!
//! Table and column names come straight from user input and CSV headers, so
//! every identifier is double-quoted with embedded quotes doubled.

use crate::error::{DbError, Result};
use crate::types::ColumnDescriptor;

/// Quote an identifier for use in SQLite statements.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Reject identifiers SQLite cannot store even when quoted.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DbError::invalid_identifier("name is empty"));
    }
    if name.contains('\0') {
        return Err(DbError::invalid_identifier(format!(
            "{:?} contains a NUL byte",
            name
        )));
    }
    Ok(())
}

/// `CREATE TABLE "t" ("a" INTEGER, "b" TEXT)`
pub fn create_table_sql(table: &str, columns: &[ColumnDescriptor]) -> String {
    let columns_sql = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.sql_type.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table), columns_sql)
}

/// `INSERT INTO "t" ("a", "b") VALUES (?1, ?2)`
pub fn insert_sql(table: &str, columns: &[ColumnDescriptor]) -> String {
    let names = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names,
        placeholders
    )
}

/// `DROP TABLE IF EXISTS "t"`
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

/// `SELECT * FROM "t" LIMIT n`
pub fn preview_sql(table: &str, limit: usize) -> String {
    format!("SELECT * FROM {} LIMIT {}", quote_ident(table), limit)
}
