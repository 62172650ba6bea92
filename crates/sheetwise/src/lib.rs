//! Sheetwise: load delimited files into SQLite and query them in SQL or in
//! plain English.
//!
//! # Architecture
//!
//! ```text
//! session ──► commands            (parse one line)
//!    │
//!    ├──► importer ──► tabular     (read CSV/TSV)
//!    │        ├──────► type_mapper (INTEGER / REAL / TEXT)
//!    │        └──────► conflict    (overwrite / rename / skip)
//!    │
//!    └──► schema ──► llm           (question + schema -> SQL)
//!
//! everything persists through sheetwise_db::Store
//! ```
//!
//! Failures are [`SessionError`]s. The session records each one in an
//! [`sheetwise_logging::ErrorSink`] and keeps going.

pub mod commands;
pub mod config;
pub mod conflict;
pub mod error;
pub mod importer;
pub mod llm;
pub mod output;
pub mod schema;
pub mod session;
pub mod tabular;
pub mod type_mapper;

pub use config::{AppConfig, LlmSettings};
pub use conflict::{ConflictChoice, ConflictDecider, ConflictPolicy, ScriptedDecider};
pub use error::{Operation, SessionError};
pub use importer::{import_file, ImportOutcome, ImportReport, ImportRequest};
pub use llm::{LlmError, MockTranslator, OpenAiTranslator, SqlTranslator};
pub use session::{Session, Step};
