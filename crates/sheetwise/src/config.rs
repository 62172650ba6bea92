//! Resolved runtime configuration.
//!
//! Values come from command-line flags with environment fallbacks (see
//! `main.rs`); this module only holds the result and the defaults.

use std::path::PathBuf;
use std::time::Duration;

use sheetwise_db::DEFAULT_DB_PATH;
use sheetwise_logging::DEFAULT_ERROR_LOG;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default OpenAI-compatible API root.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Language model settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub model: String,
    pub base_url: String,
    /// Checked when a question is asked, not at startup.
    pub api_key: Option<String>,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// Everything a session needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file, created if absent.
    pub db_path: PathBuf,
    /// Append-only error log.
    pub error_log: PathBuf,
    pub llm: LlmSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            llm: LlmSettings::default(),
        }
    }
}
