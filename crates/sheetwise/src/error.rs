//! Session error taxonomy.
//!
//! Every command failure is one of these. The session records
//! [`SessionError::log_line`] in the error log and shows
//! [`SessionError::report`] to the user; nothing escapes the command loop.

use sheetwise_db::DbError;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

use crate::llm::LlmError;
use crate::tabular::ParseError;

/// A failed command.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The tabular source is missing or malformed.
    #[error("Error reading '{}': {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The target table name could not be settled.
    #[error("Table '{table}' already exists: {detail}")]
    SchemaConflict { table: String, detail: String },

    /// SQLite rejected a statement.
    #[error("{operation}: {source}")]
    Execution {
        operation: Operation,
        #[source]
        source: DbError,
    },

    /// The language model call failed or returned nothing usable.
    #[error("Translation failed: {0}")]
    Translation(#[from] LlmError),

    /// A command was invoked with the wrong arguments.
    #[error("Invalid '{command}' command: {detail}")]
    Usage {
        command: &'static str,
        detail: String,
    },
}

/// What was being executed when SQLite failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Creating or populating a table during import.
    Import { table: String },
    /// A raw `query` command.
    Query,
    /// SQL produced by the translator.
    GeneratedSql,
    /// Reading store metadata (table list, schema).
    Catalog,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Import { table } => {
                write!(f, "Error creating or populating table '{}'", table)
            }
            Operation::Query => f.write_str("Query failed"),
            Operation::GeneratedSql => f.write_str("Generated SQL was invalid"),
            Operation::Catalog => f.write_str("Failed to read database catalog"),
        }
    }
}

impl SessionError {
    pub fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn execution(operation: Operation, source: DbError) -> Self {
        Self::Execution { operation, source }
    }

    pub fn usage(command: &'static str, detail: impl Into<String>) -> Self {
        Self::Usage {
            command,
            detail: detail.into(),
        }
    }

    /// Short taxonomy label.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Parse { .. } => "ParseError",
            SessionError::SchemaConflict { .. } => "SchemaConflict",
            SessionError::Execution { .. } => "ExecutionError",
            SessionError::Translation(_) => "TranslationError",
            SessionError::Usage { .. } => "UsageError",
        }
    }

    /// One line for the error log.
    pub fn log_line(&self) -> String {
        format!("[{}] {}", self.kind(), self).replace('\n', " ")
    }

    /// Suggestions shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            SessionError::Parse { path, .. } => vec![
                format!("TRY: Check that the file exists and is readable: {}", path.display()),
                "TRY: Make sure every row has the same number of fields as the header".to_string(),
            ],
            SessionError::SchemaConflict { .. } => {
                vec!["TRY: Load again and choose a different table name".to_string()]
            }
            SessionError::Execution {
                operation: Operation::GeneratedSql,
                ..
            } => vec![
                "TRY: Rephrase the question, or run the SQL yourself with 'query'".to_string(),
            ],
            SessionError::Execution {
                operation: Operation::Query,
                ..
            } => vec!["TRY: Use 'tables' to see which tables exist".to_string()],
            SessionError::Execution { .. } => Vec::new(),
            SessionError::Translation(LlmError::ApiKey(_)) => {
                vec!["TRY: export OPENAI_API_KEY=<your key>".to_string()]
            }
            SessionError::Translation(_) => {
                vec!["TRY: Check your network connection and API quota".to_string()]
            }
            SessionError::Usage { command, .. } => match *command {
                "load" => vec!["Usage: load <csv_file> <table_name>".to_string()],
                "query" => vec!["Usage: query <SQL>".to_string()],
                "ask" => vec!["Usage: ask <question>".to_string()],
                _ => vec!["TRY: Type 'help' to see options".to_string()],
            },
        }
    }

    /// User-facing rendering.
    pub fn report(&self) -> String {
        let mut out = format!("ERROR: {}", self);
        for suggestion in self.suggestions() {
            let _ = write!(out, "\n  {}", suggestion);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_report() {
        let err = SessionError::usage("load", "expected 2 arguments, got 1");
        let report = err.report();
        assert!(report.starts_with("ERROR: Invalid 'load' command"));
        assert!(report.contains("Usage: load <csv_file> <table_name>"));
        assert_eq!(err.kind(), "UsageError");
    }

    #[test]
    fn test_generated_sql_is_execution_error() {
        let err = SessionError::execution(
            Operation::GeneratedSql,
            DbError::not_found("orders"),
        );
        assert_eq!(err.kind(), "ExecutionError");
        assert!(err.to_string().starts_with("Generated SQL was invalid"));
    }

    #[test]
    fn test_log_line_is_single_line() {
        let err = SessionError::usage("ask", "question\nis empty");
        let line = err.log_line();
        assert!(!line.contains('\n'));
        assert!(line.starts_with("[UsageError]"));
    }

    #[test]
    fn test_import_operation_names_table() {
        let err = SessionError::execution(
            Operation::Import {
                table: "orders".to_string(),
            },
            DbError::invalid_identifier("name is empty"),
        );
        assert!(err
            .to_string()
            .contains("Error creating or populating table 'orders'"));
    }
}
