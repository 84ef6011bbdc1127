use std::io;
use thiserror::Error;

/// Failures of the outer surfaces. The engine itself reports "nothing to debug" as `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed message frame: {0}")]
    Frame(String),

    #[error("request '{command}' is missing its arguments")]
    MissingArguments { command: String },

    #[error("{0}")]
    Usage(String),

    #[error("could not load settings from {path}: {reason}")]
    Settings { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
