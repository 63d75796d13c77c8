//! Error types for fetching and building quiz questions.

use thiserror::Error;

/// Coarse classification of a failed load, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, non-success status or an API-level rejection.
    Fetch,
    /// The response arrived but its contents were unusable.
    DataFormat,
}

/// Errors emitted by a `QuestionProvider` or while building questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question service rejected the request (response code {0})")]
    Api(u8),
    #[error("question data could not be decoded: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed question data: {0}")]
    DataFormat(String),
}

impl QuizError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::HttpStatus(_) | QuizError::Http(_) | QuizError::Api(_) => ErrorKind::Fetch,
            QuizError::Json(_) | QuizError::DataFormat(_) => ErrorKind::DataFormat,
        }
    }
}
