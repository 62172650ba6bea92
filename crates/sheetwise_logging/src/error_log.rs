//! Append-only error log.
//!
//! Every failed operation is recorded as one line of free-form text. The log
//! is never read back by the program. Recording never fails the caller: if
//! the sink itself cannot write, the problem is reported through `tracing`
//! and otherwise ignored.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default error log location, relative to the working directory.
pub const DEFAULT_ERROR_LOG: &str = "error_log.txt";

/// Destination for user-visible failure records.
pub trait ErrorSink {
    /// Append one message. Must not panic and must not return an error.
    fn record(&self, message: &str);
}

/// Error sink backed by a text file opened in append mode per record.
#[derive(Debug, Clone)]
pub struct FileErrorLog {
    path: PathBuf,
}

impl FileErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileErrorLog {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LOG)
    }
}

impl ErrorSink for FileErrorLog {
    fn record(&self, message: &str) {
        // Mirrored to the diagnostics log; the user already sees the report.
        tracing::info!(target: "sheetwise::error_log", "{}", message);

        // One record per line, even if the message spans several.
        let line = message.replace('\n', " ");
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", line));

        if let Err(err) = result {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "Failed to append to error log"
            );
        }
    }
}

/// In-memory error sink for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryErrorLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<String> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl ErrorSink for MemoryErrorLog {
    fn record(&self, message: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(message.to_string());
    }
}

impl<T: ErrorSink + ?Sized> ErrorSink for &T {
    fn record(&self, message: &str) {
        (**self).record(message)
    }
}

impl<T: ErrorSink + ?Sized> ErrorSink for std::sync::Arc<T> {
    fn record(&self, message: &str) {
        (**self).record(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_error_log_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error_log.txt");
        let log = FileErrorLog::new(&path);

        log.record("first failure");
        log.record("second\nfailure");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first failure\nsecond failure\n");
    }

    #[test]
    fn test_file_error_log_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error_log.txt");
        std::fs::write(&path, "older entry\n").unwrap();

        FileErrorLog::new(&path).record("newer entry");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "older entry\nnewer entry\n");
    }

    #[test]
    fn test_file_error_log_unwritable_path_does_not_panic() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let log = FileErrorLog::new(dir.path());
        log.record("lost message");
    }

    #[test]
    fn test_memory_error_log() {
        let log = MemoryErrorLog::new();
        assert!(log.is_empty());
        log.record("a");
        log.record("b");
        assert_eq!(log.entries(), vec!["a".to_string(), "b".to_string()]);
    }
}
