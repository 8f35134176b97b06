use thiserror::Error;

use crate::model::ParseError;

/// Why a single backend call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {code}{}", .message.as_ref().map(|m| format!(" ({m})")).unwrap_or_default())]
    Status { code: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(#[from] ParseError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// The fetch an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadEditions,
    LoadBooks,
    Compare,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::LoadEditions => write!(f, "load editions"),
            Operation::LoadBooks => write!(f, "load books"),
            Operation::Compare => write!(f, "load comparison"),
        }
    }
}

/// A failed fetch, tagged with what the viewer was trying to do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("Failed to load Bible versions: {0}")]
    Catalog(FetchError),
    #[error("Failed to load books for {edition_id}: {source}")]
    Books {
        edition_id: String,
        source: FetchError,
    },
    #[error("Failed to load {book_id} {chapter} comparison: {source}")]
    Comparison {
        book_id: String,
        chapter: u32,
        source: FetchError,
    },
}

impl ViewerError {
    pub fn operation(&self) -> Operation {
        match self {
            ViewerError::Catalog(_) => Operation::LoadEditions,
            ViewerError::Books { .. } => Operation::LoadBooks,
            ViewerError::Comparison { .. } => Operation::Compare,
        }
    }
}
