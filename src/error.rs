//! Error types for the local task cache and the command-line front end.
//!
//! The scheduling engine itself never fails; these only cover I/O and user
//! input at the edges.

use std::path::PathBuf;

use thiserror::Error;

use crate::repeat::RuleError;

/// Errors from reading or writing the local task cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no task found with id or title '{0}'")]
    NotFound(String),
    #[error("task {0} is already completed")]
    AlreadyCompleted(String),
    #[error("multiple tasks match '{query}': {}. Use the id instead.", .ids.join(", "))]
    Ambiguous { query: String, ids: Vec<String> },
    #[error("could not read date '{0}' (try YYYY-MM-DD, today, tomorrow, in 3d, next friday)")]
    InvalidDate(String),
    #[error("invalid rule '{text}': {source}")]
    InvalidRule {
        text: String,
        #[source]
        source: RuleError,
    },
    #[error("reading standard input: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("encoding output: {0}")]
    Output(#[from] serde_json::Error),
}
