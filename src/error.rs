use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Request could not be sent, or the server answered with a non-2xx status.
    #[error("connection error for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Page markup is missing something the extractor relies on.
    #[error("unexpected page structure: {0}")]
    Parse(String),

    /// The persisted table is missing or unusable.
    #[error("table {}: {reason}", .path.display())]
    State { path: PathBuf, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse(reason.into())
    }

    pub fn state(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::State {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A single row that could not be processed. Collected instead of aborting the run.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub row: String,
    pub reason: String,
}

impl RowFailure {
    pub fn new(row: impl Into<String>, err: &ScrapeError) -> Self {
        Self {
            row: row.into(),
            reason: err.to_string(),
        }
    }
}
