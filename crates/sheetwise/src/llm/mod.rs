//! Natural-language to SQL translation.
//!
//! The language model sits behind [`SqlTranslator`] so the session never
//! depends on a network service directly. [`openai::OpenAiTranslator`] is the
//! production implementation; [`mock::MockTranslator`] replays canned replies
//! for tests.

pub mod mock;
pub mod openai;

use std::sync::Arc;
use thiserror::Error;

pub use mock::MockTranslator;
pub use openai::OpenAiTranslator;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during translation
#[derive(Debug, Error)]
pub enum LlmError {
    /// API key not found
    #[error("API key error: {0}")]
    ApiKey(String),

    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider answered with a non-success status
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model answered with no SQL
    #[error("model returned an empty reply")]
    EmptyReply,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Http(e.to_string())
        }
    }
}

// =============================================================================
// Translator Trait
// =============================================================================

/// Turns a question plus a schema description into one SQL statement.
pub trait SqlTranslator {
    /// Name for logs and the startup banner.
    fn name(&self) -> &str;

    /// Translate `question` against `schema` (see [`crate::schema`]).
    ///
    /// Blocks until the model answers. Returns the cleaned SQL text.
    fn translate(&self, question: &str, schema: &str) -> Result<String, LlmError>;
}

impl<T: SqlTranslator + ?Sized> SqlTranslator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn translate(&self, question: &str, schema: &str) -> Result<String, LlmError> {
        (**self).translate(question, schema)
    }
}

impl<T: SqlTranslator + ?Sized> SqlTranslator for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn translate(&self, question: &str, schema: &str) -> Result<String, LlmError> {
        (**self).translate(question, schema)
    }
}

// =============================================================================
// Prompt
// =============================================================================

/// Build the single user message sent to the model.
pub fn build_prompt(question: &str, schema: &str) -> String {
    format!(
        "You translate questions about a SQLite database into SQL.\n\
         The database contains the following tables and columns:\n\
         \n\
         {schema}\n\
         \n\
         Question: \"{question}\"\n\
         \n\
         Respond with exactly one valid SQLite statement that answers the question.\n\
         Return only the SQL statement, with no explanation and no formatting.",
        schema = schema.trim_end(),
        question = question,
    )
}

/// Trim the reply and unwrap a Markdown code fence if the model added one.
///
/// The fence may span several lines or sit on one line, with or without a
/// `sql` language tag.
pub fn clean_sql_reply(reply: &str) -> Result<String, LlmError> {
    let text = reply.trim();

    let text = match text.strip_prefix("```") {
        Some(rest) => {
            let end = rest.rfind("```").unwrap_or(rest.len());
            strip_language_tag(&rest[..end]).trim()
        }
        None => text,
    };

    if text.is_empty() {
        return Err(LlmError::EmptyReply);
    }
    Ok(text.to_string())
}

fn strip_language_tag(body: &str) -> &str {
    let tag_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let tag = &body[..tag_end];
    if tag.eq_ignore_ascii_case("sql") || tag.eq_ignore_ascii_case("sqlite") {
        &body[tag_end..]
    } else {
        body
    }
}
