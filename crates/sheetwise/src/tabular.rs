//! Delimiter-separated input files.
//!
//! The first record is the header. Rows are kept as raw strings; typing
//! happens later in [`crate::type_mapper`].

use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Why a tabular source could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot open file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("file has no header row")]
    MissingHeader,
}

/// Parsed input: header names plus rows of raw cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Read a file, picking the delimiter from its extension unless given.
    pub fn from_path(path: &Path, delimiter: Option<u8>) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        let delimiter = delimiter.unwrap_or_else(|| delimiter_for(path));
        Self::from_reader(file, delimiter)
    }

    /// Read from any source. Ragged rows are an error.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, ParseError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if raw_headers.is_empty() {
            return Err(ParseError::MissingHeader);
        }
        let headers = normalize_headers(raw_headers);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).map(String::as_str).unwrap_or(""))
    }
}

/// Tab for `.tsv`/`.tab` files, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

/// Name blank headers `Unnamed: N` and suffix repeats with `.1`, `.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        // SQLite column names are case-insensitive.
        while !seen.insert(candidate.to_lowercase()) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }

    headers
}
