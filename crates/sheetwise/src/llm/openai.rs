//! OpenAI-compatible chat-completions translator.
//!
//! One blocking HTTPS request per question:
//! `POST {base_url}/chat/completions` with a single user message and
//! `temperature: 0`. The first choice's message text is the SQL.
//!
//! # Configuration
//!
//! - API key: `OPENAI_API_KEY`. A missing key is reported when a question is
//!   asked, not at startup.
//! - Model: `--model` / `SHEETWISE_MODEL`, default `gpt-3.5-turbo`
//! - Endpoint: `--api-base` / `OPENAI_BASE_URL`

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{build_prompt, clean_sql_reply, LlmError, SqlTranslator};
use crate::config::LlmSettings;

// =============================================================================
// API Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// =============================================================================
// Translator
// =============================================================================

/// Chat-completions API translator
pub struct OpenAiTranslator {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl OpenAiTranslator {
    /// Build a translator from resolved settings.
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        // `None` disables the blocking client's 30s default.
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: settings.model.clone(),
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SqlTranslator for OpenAiTranslator {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn translate(&self, question: &str, schema: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::ApiKey("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let prompt = build_prompt(question, schema);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: 0.0,
        };

        info!(model = %self.model, "Requesting SQL translation");
        debug!(prompt = %prompt, "Translation prompt");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(LlmError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json()?;
        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        clean_sql_reply(&content)
    }
}
