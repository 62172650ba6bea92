//! Sheetwise command-line entry point.
//!
//! Without a subcommand this starts the interactive shell. The `load`,
//! `query`, `tables` and `ask` subcommands run a single command against the
//! database and exit with status 1 if it failed.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sheetwise::commands::Command;
use sheetwise::config::{DEFAULT_API_BASE, DEFAULT_MODEL};
use sheetwise::{AppConfig, ConflictPolicy, LlmSettings, OpenAiTranslator, Session, Step};
use sheetwise_db::{Store, DEFAULT_DB_PATH};
use sheetwise_logging::{init_logging, FileErrorLog, LogConfig, DEFAULT_ERROR_LOG};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "sheetwise",
    version,
    about = "Load CSV files into SQLite and query them in SQL or plain English"
)]
struct Cli {
    /// SQLite database file (created if absent)
    #[arg(long, env = "SHEETWISE_DB", default_value = DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    /// Append-only error log
    #[arg(long, env = "SHEETWISE_ERROR_LOG", default_value = DEFAULT_ERROR_LOG, global = true)]
    error_log: PathBuf,

    /// Chat model used by `ask`
    #[arg(long, env = "SHEETWISE_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// OpenAI-compatible API root
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE, global = true)]
    api_base: String,

    /// API key for the chat model
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Give up on the model after this many seconds (default: wait)
    #[arg(long, value_name = "SECS", global = true)]
    llm_timeout: Option<u64>,

    /// Show diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive shell (default)
    Shell,

    /// Import a CSV or TSV file into a table
    Load {
        file: PathBuf,

        table: String,

        /// Field delimiter (default: tab for .tsv/.tab, comma otherwise)
        #[arg(long)]
        delimiter: Option<char>,

        /// What to do if the table already exists
        #[arg(long, value_enum, default_value_t = OnConflict::Prompt)]
        on_conflict: OnConflict,
    },

    /// Run one SQL statement
    Query {
        #[arg(required = true, num_args = 1..)]
        sql: Vec<String>,
    },

    /// List tables
    Tables,

    /// Translate a question to SQL and run it
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OnConflict {
    Prompt,
    Overwrite,
    Skip,
}

impl From<OnConflict> for ConflictPolicy {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Prompt => ConflictPolicy::Prompt,
            OnConflict::Overwrite => ConflictPolicy::Overwrite,
            OnConflict::Skip => ConflictPolicy::Skip,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match init_logging(LogConfig {
        app_name: "sheetwise",
        verbose: cli.verbose,
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig {
        db_path: cli.db,
        error_log: cli.error_log,
        llm: LlmSettings {
            model: cli.model,
            base_url: cli.api_base,
            api_key: cli.api_key,
            timeout: cli.llm_timeout.map(Duration::from_secs),
        },
    };

    let store = Store::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let translator = OpenAiTranslator::new(&config.llm).context("Failed to build LLM client")?;
    let errors = FileErrorLog::new(&config.error_log);
    info!(
        db = %config.db_path.display(),
        error_log = %config.error_log.display(),
        model = %config.llm.model,
        "Starting sheetwise"
    );

    let stdin = io::stdin();
    let session = Session::new(
        store,
        Box::new(translator),
        Box::new(errors),
        stdin.lock(),
        io::stdout(),
    );

    let (command, session) = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            session.run()?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Load {
            file,
            table,
            delimiter,
            on_conflict,
        } => {
            let delimiter = delimiter.map(delimiter_byte).transpose()?;
            let command = Command::Load {
                source: file.to_string_lossy().into_owned(),
                table,
            };
            let session = session
                .with_conflict_policy(on_conflict.into())
                .with_delimiter(delimiter);
            (command, session)
        }
        Commands::Query { sql } => (Command::Query(sql.join(" ")), session),
        Commands::Tables => (Command::Tables, session),
        Commands::Ask { question } => (Command::Ask(question.join(" ")), session),
    };

    let mut session = session;
    let step = session.dispatch(command);
    session.close()?;

    Ok(if step == Step::Failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn delimiter_byte(c: char) -> Result<u8> {
    if !c.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", c);
    }
    Ok(c as u8)
}
