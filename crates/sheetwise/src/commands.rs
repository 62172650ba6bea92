//! Shell command parsing.
//!
//! The keyword is case-insensitive; everything after it is passed through
//! as typed.

use crate::error::SessionError;

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Load { source: String, table: String },
    Query(String),
    Tables,
    Ask(String),
    Exit,
    /// Blank line.
    Empty,
    /// Not a recognized command. Reported, never logged.
    Unknown(String),
}

/// Parse one input line.
///
/// Only malformed `load`, `query` and `ask` invocations are errors.
pub fn parse_command(line: &str) -> Result<Command, SessionError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_lowercase().as_str() {
        "help" if rest.is_empty() => Command::Help,
        "tables" if rest.is_empty() => Command::Tables,
        "exit" if rest.is_empty() => Command::Exit,
        "load" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [source, table] => Command::Load {
                    source: (*source).to_string(),
                    table: (*table).to_string(),
                },
                _ => {
                    return Err(SessionError::usage(
                        "load",
                        format!("expected 2 arguments, got {}", args.len()),
                    ))
                }
            }
        }
        "query" => {
            if rest.is_empty() {
                return Err(SessionError::usage("query", "missing SQL statement"));
            }
            Command::Query(rest.to_string())
        }
        "ask" => {
            let question = strip_quotes(rest);
            if question.is_empty() {
                return Err(SessionError::usage("ask", "missing question"));
            }
            Command::Ask(question.to_string())
        }
        _ => Command::Unknown(line.to_string()),
    };

    Ok(command)
}

/// `"how many"` and `'how many'` both become `how many`.
fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return text[1..text.len() - 1].trim();
        }
    }
    text
}

/// Text printed by `help`.
pub const HELP_TEXT: &str = "\
Available commands:
  load <csv_file> <table_name>  Import a CSV file into a new table
  query <SQL>                   Run a SQL statement
  tables                        List the tables in the database
  ask <question>                Ask a question in plain English
  help                          Show this message
  exit                          Quit";
