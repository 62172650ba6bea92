//! The command loop.
//!
//! A [`Session`] owns the store connection, the translator and the error sink
//! for its whole lifetime and processes one command at a time. Every command
//! failure is recorded in the error sink and reported on the session output;
//! only `exit` or end of input ends the loop.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sheetwise_db::Store;
use sheetwise_logging::ErrorSink;
use tracing::{info, warn};

use crate::commands::{parse_command, Command, HELP_TEXT};
use crate::conflict::{ConflictPolicy, FixedDecision, PromptDecider};
use crate::error::{Operation, SessionError};
use crate::importer::{import_file, ImportOutcome, ImportRequest};
use crate::llm::SqlTranslator;
use crate::output::{render_import, render_result, render_tables};
use crate::schema::describe_schema;

const PROMPT: &str = ">>> ";
const UNKNOWN_COMMAND: &str = "Unknown command. Type 'help' for options.";

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The command failed; the error has been recorded and reported.
    Failed,
    Exit,
}

/// Interactive or scripted session over one store.
pub struct Session<R, W> {
    store: Store,
    translator: Box<dyn SqlTranslator>,
    errors: Box<dyn ErrorSink>,
    input: R,
    output: W,
    conflict_policy: ConflictPolicy,
    delimiter: Option<u8>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        store: Store,
        translator: Box<dyn SqlTranslator>,
        errors: Box<dyn ErrorSink>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            store,
            translator,
            errors,
            input,
            output,
            conflict_policy: ConflictPolicy::Prompt,
            delimiter: None,
        }
    }

    /// How existing tables are handled on `load`. Defaults to asking.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Force a delimiter for every `load` instead of guessing from the
    /// file extension.
    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run the read-evaluate loop until `exit` or end of input, then close
    /// the store.
    pub fn run(mut self) -> Result<()> {
        self.say(format!(
            "Sheetwise: load CSV files into SQLite and query them in SQL or plain English.\n\
             Translator: {}. Type 'help' for commands.",
            self.translator.name()
        ));

        loop {
            let _ = write!(self.output, "{}", PROMPT);
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    // EOF after a prompt; keep the terminal tidy.
                    self.say("");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to read input, ending session");
                    break;
                }
            }

            if self.handle_line(&line) == Step::Exit {
                break;
            }
        }

        self.say("Goodbye!");
        self.close()
    }

    /// Parse and execute one line of input.
    pub fn handle_line(&mut self, line: &str) -> Step {
        match parse_command(line) {
            Ok(command) => self.dispatch(command),
            Err(err) => self.fail(err),
        }
    }

    /// Execute one parsed command.
    pub fn dispatch(&mut self, command: Command) -> Step {
        let result = match command {
            Command::Help => {
                self.say(HELP_TEXT);
                Ok(())
            }
            Command::Load { source, table } => self.load(Path::new(&source), &table),
            Command::Query(sql) => self.query(&sql),
            Command::Tables => self.tables(),
            Command::Ask(question) => self.ask(&question),
            Command::Exit => return Step::Exit,
            Command::Empty => Ok(()),
            Command::Unknown(line) => {
                info!(line = %line, "Unknown command");
                self.say(UNKNOWN_COMMAND);
                Ok(())
            }
        };

        match result {
            Ok(()) => Step::Continue,
            Err(err) => self.fail(err),
        }
    }

    /// Close the store connection.
    pub fn close(self) -> Result<()> {
        self.store.close().context("Failed to close database")
    }

    fn load(&mut self, source: &Path, table: &str) -> Result<(), SessionError> {
        let request = ImportRequest::new(source, table).with_delimiter(self.delimiter);

        let outcome = match self.conflict_policy {
            ConflictPolicy::Prompt => {
                let mut decider = PromptDecider::new(&mut self.input, &mut self.output);
                import_file(&mut self.store, request, &mut decider)?
            }
            ConflictPolicy::Overwrite => {
                import_file(&mut self.store, request, &mut FixedDecision::Overwrite)?
            }
            ConflictPolicy::Skip => import_file(&mut self.store, request, &mut FixedDecision::Skip)?,
        };

        match outcome {
            ImportOutcome::Imported(report) => self.say(render_import(&report)),
            ImportOutcome::Skipped { requested } => {
                self.say(format!("Skipped: table '{}' was left unchanged.", requested))
            }
        }
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<(), SessionError> {
        let result = self
            .store
            .execute(sql)
            .map_err(|e| SessionError::execution(Operation::Query, e))?;
        self.say(render_result(&result));
        Ok(())
    }

    fn tables(&mut self) -> Result<(), SessionError> {
        let tables = self
            .store
            .list_tables()
            .map_err(|e| SessionError::execution(Operation::Catalog, e))?;
        self.say(render_tables(&tables));
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<(), SessionError> {
        let schema = describe_schema(&self.store)
            .map_err(|e| SessionError::execution(Operation::Catalog, e))?;
        if schema.is_empty() {
            warn!("Asking a question against an empty database");
        }

        let sql = self.translator.translate(question, &schema)?;
        self.say(format!("Generated SQL:\n  {}", sql));

        let result = self
            .store
            .execute(&sql)
            .map_err(|e| SessionError::execution(Operation::GeneratedSql, e))?;
        self.say(render_result(&result));
        Ok(())
    }

    fn fail(&mut self, err: SessionError) -> Step {
        self.errors.record(&err.log_line());
        self.say(err.report());
        Step::Failed
    }

    fn say(&mut self, text: impl Display) {
        let _ = writeln!(self.output, "{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockTranslator;
    use sheetwise_logging::MemoryErrorLog;
    use std::io::Cursor;
    use std::sync::Arc;

    fn session(
        input: &str,
        errors: Arc<MemoryErrorLog>,
    ) -> Session<Cursor<String>, Vec<u8>> {
        Session::new(
            Store::open_in_memory().unwrap(),
            Box::new(MockTranslator::new()),
            Box::new(errors),
            Cursor::new(input.to_string()),
            Vec::new(),
        )
    }

    fn output_of<R>(session: &Session<R, Vec<u8>>) -> String {
        String::from_utf8_lossy(&session.output).into_owned()
    }

    #[test]
    fn test_unknown_command_is_not_logged() {
        let errors = Arc::new(MemoryErrorLog::new());
        let mut session = session("", errors.clone());

        assert_eq!(session.handle_line("foo bar"), Step::Continue);
        assert!(output_of(&session).contains(UNKNOWN_COMMAND));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_usage_error_is_logged() {
        let errors = Arc::new(MemoryErrorLog::new());
        let mut session = session("", errors.clone());

        assert_eq!(session.handle_line("load one.csv"), Step::Failed);
        let entries = errors.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("[UsageError]"));
        assert!(output_of(&session).contains("Usage: load <csv_file> <table_name>"));
    }

    #[test]
    fn test_query_failure_keeps_session_alive() {
        let errors = Arc::new(MemoryErrorLog::new());
        let mut session = session("", errors.clone());

        assert_eq!(session.handle_line("query SELECT * FROM missing"), Step::Failed);
        assert_eq!(session.handle_line("query SELECT 1 + 1 AS two"), Step::Continue);
        assert!(output_of(&session).contains("(1 row)"));
        assert_eq!(errors.entries().len(), 1);
    }

    #[test]
    fn test_translation_failure_is_logged() {
        let errors = Arc::new(MemoryErrorLog::new());
        let mut session = session("", errors.clone());

        // The mock has no queued reply.
        assert_eq!(session.handle_line("ask how many tables"), Step::Failed);
        assert!(errors.entries()[0].starts_with("[TranslationError]"));
    }

    #[test]
    fn test_exit_and_eof_end_the_loop() {
        let errors = Arc::new(MemoryErrorLog::new());
        let mut session = session("", errors.clone());
        assert_eq!(session.handle_line("EXIT"), Step::Exit);

        session.run().unwrap();
        assert!(errors.is_empty());
    }
}
