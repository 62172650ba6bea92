//! Table name conflict resolution.
//!
//! When an import targets a table that already exists, a [`ConflictDecider`]
//! chooses between overwriting, renaming and skipping. The interactive shell
//! asks the user ([`PromptDecider`]); one-shot loads use a fixed policy
//! ([`FixedDecision`]); tests script the answers ([`ScriptedDecider`]).

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use sheetwise_db::{CreateMode, Store};
use tracing::{info, warn};

use crate::error::{Operation, SessionError};

/// One answer to "this table already exists".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictChoice {
    Overwrite,
    Rename(String),
    Skip,
    /// Anything that is not one of the above, kept for the error log.
    Invalid(String),
}

/// Source of conflict decisions.
pub trait ConflictDecider {
    fn decide(&mut self, table: &str) -> ConflictChoice;
}

impl<T: ConflictDecider + ?Sized> ConflictDecider for &mut T {
    fn decide(&mut self, table: &str) -> ConflictChoice {
        (**self).decide(table)
    }
}

/// Where the imported rows should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No table of this name exists.
    Create(String),
    /// Replace the existing table of this name.
    Replace(String),
    /// Abort the import without error.
    Skip,
}

impl Resolution {
    pub fn table_name(&self) -> Option<&str> {
        match self {
            Resolution::Create(name) | Resolution::Replace(name) => Some(name),
            Resolution::Skip => None,
        }
    }

    pub fn create_mode(&self) -> CreateMode {
        match self {
            Resolution::Replace(_) => CreateMode::Replace,
            _ => CreateMode::New,
        }
    }
}

/// Settle the table name for an import.
///
/// A renamed target is checked against the store again, so the loop ends only
/// on a free name, an overwrite, a skip or an invalid answer.
pub fn resolve_table_name(
    store: &Store,
    requested: &str,
    decider: &mut dyn ConflictDecider,
) -> Result<Resolution, SessionError> {
    let mut name = requested.to_string();

    loop {
        let exists = store
            .table_exists(&name)
            .map_err(|e| SessionError::execution(Operation::Catalog, e))?;
        if !exists {
            return Ok(Resolution::Create(name));
        }

        match decider.decide(&name) {
            ConflictChoice::Overwrite => {
                info!(table = %name, "Existing table will be replaced");
                return Ok(Resolution::Replace(name));
            }
            ConflictChoice::Skip => {
                info!(table = %name, "Import skipped");
                return Ok(Resolution::Skip);
            }
            ConflictChoice::Rename(new_name) => {
                let new_name = new_name.trim();
                if new_name.is_empty() {
                    return Err(SessionError::SchemaConflict {
                        table: name,
                        detail: "new table name is empty".to_string(),
                    });
                }
                info!(from = %name, to = new_name, "Import target renamed");
                name = new_name.to_string();
            }
            ConflictChoice::Invalid(answer) => {
                warn!(table = %name, answer = %answer, "Invalid conflict choice");
                return Err(SessionError::SchemaConflict {
                    table: name,
                    detail: format!("invalid choice '{}', import aborted", answer),
                });
            }
        }
    }
}

// =============================================================================
// Deciders
// =============================================================================

/// Asks on the session's own input and output streams.
///
/// End of input counts as skip.
pub struct PromptDecider<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> PromptDecider<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to read conflict answer");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> ConflictDecider for PromptDecider<'_, R, W> {
    fn decide(&mut self, table: &str) -> ConflictChoice {
        let _ = writeln!(self.output, "\nTable '{}' already exists.", table);
        let answer = match self.ask("Choose an option: (o)verwrite, (r)ename, or (s)kip: ") {
            Some(answer) => answer,
            None => return ConflictChoice::Skip,
        };

        match answer.to_lowercase().as_str() {
            "o" | "overwrite" => ConflictChoice::Overwrite,
            "s" | "skip" => ConflictChoice::Skip,
            "r" | "rename" => match self.ask("Enter new table name: ") {
                Some(name) => ConflictChoice::Rename(name),
                None => ConflictChoice::Skip,
            },
            _ => ConflictChoice::Invalid(answer),
        }
    }
}

/// Same answer every time. Used by one-shot `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedDecision {
    Overwrite,
    Skip,
}

impl ConflictDecider for FixedDecision {
    fn decide(&mut self, _table: &str) -> ConflictChoice {
        match self {
            FixedDecision::Overwrite => ConflictChoice::Overwrite,
            FixedDecision::Skip => ConflictChoice::Skip,
        }
    }
}

/// How a session settles conflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Ask on the session input.
    #[default]
    Prompt,
    Overwrite,
    Skip,
}

/// Replays a fixed list of answers and remembers which tables it was asked
/// about. Returns [`ConflictChoice::Invalid`] once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    answers: VecDeque<ConflictChoice>,
    asked: Vec<String>,
}

impl ScriptedDecider {
    pub fn new(answers: impl IntoIterator<Item = ConflictChoice>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl ConflictDecider for ScriptedDecider {
    fn decide(&mut self, table: &str) -> ConflictChoice {
        self.asked.push(table.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| ConflictChoice::Invalid("<no scripted answer>".to_string()))
    }
}
