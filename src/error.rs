//! Error types for build-trace analysis
//!
//! Every analyzer returns an explicit `Result`; a failure for one header or
//! candidate is reported to the caller, which decides whether to skip it.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while analyzing a build trace
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Coarse error classification shared with callers of the analysis core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AnalysisError,
    NotFound,
    FileNotFound,
    FileReadError,
    ParseError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AnalysisError => "ANALYSIS_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::FileNotFound => "FILE_NOT_FOUND",
            ErrorKind::FileReadError => "FILE_READ_ERROR",
            ErrorKind::ParseError => "PARSE_ERROR",
        };
        f.write_str(name)
    }
}

impl AnalysisError {
    /// Shorthand for an `Analysis` error
    pub fn analysis(message: impl Into<String>) -> Self {
        AnalysisError::Analysis(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Analysis(_) => ErrorKind::AnalysisError,
            AnalysisError::NotFound(_) => ErrorKind::NotFound,
            AnalysisError::FileNotFound(_) => ErrorKind::FileNotFound,
            AnalysisError::FileRead { .. } => ErrorKind::FileReadError,
            AnalysisError::Parse { .. } => ErrorKind::ParseError,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
