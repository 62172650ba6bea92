//! Mock translator for deterministic tests
//!
//! Replies are queued and consumed in order. If no reply is queued the call
//! fails, so a test that asks more questions than it scripted is caught.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{build_prompt, clean_sql_reply, LlmError, SqlTranslator};

/// A translation request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub question: String,
    pub schema: String,
    /// The prompt a real provider would have received.
    pub prompt: String,
}

/// Mock translator with canned replies
#[derive(Debug, Default)]
pub struct MockTranslator {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, sql: impl Into<String>) {
        lock(&self.replies).push_back(Ok(sql.into()));
    }

    /// Queue a failed call
    pub fn queue_failure(&self, error: LlmError) {
        lock(&self.replies).push_back(Err(error));
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn replies_remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

impl SqlTranslator for MockTranslator {
    fn name(&self) -> &str {
        "Mock"
    }

    fn translate(&self, question: &str, schema: &str) -> Result<String, LlmError> {
        lock(&self.calls).push(RecordedCall {
            question: question.to_string(),
            schema: schema.to_string(),
            prompt: build_prompt(question, schema),
        });

        let reply = lock(&self.replies).pop_front().ok_or_else(|| {
            LlmError::InvalidResponse("no mock reply queued".to_string())
        })?;
        clean_sql_reply(&reply?)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
