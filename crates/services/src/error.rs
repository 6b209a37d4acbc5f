//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionPoolError, SessionStateError};
use storage::StorageError;

/// Errors emitted by a `VerdictClassifier`.
///
/// These never reach clients; `VerdictJudge` replaces them with a fallback verdict.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClassifierError {
    /// The completion carried no choice or a `null` content field.
    #[error("classifier returned no completion content")]
    EmptyResponse,
    #[error("classifier request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while reading classifier configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing {var}; set it to the classifier API key")]
    MissingCredential { var: &'static str },
    #[error("invalid value for {var}: {raw:?}")]
    InvalidValue { var: &'static str, raw: String },
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("session not started")]
    NotStarted,
    #[error("no answer provided")]
    EmptyAnswer,
    #[error("session already completed")]
    Completed,
    #[error("session not complete")]
    NotComplete,
    #[error("answer already recorded for this question")]
    Conflict,
    #[error("questions per session must be at least 1")]
    InvalidQuestionCount,
    #[error(transparent)]
    Pool(#[from] QuestionPoolError),
    #[error(transparent)]
    SessionState(SessionStateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SessionStateError> for QuizError {
    fn from(err: SessionStateError) -> Self {
        match err {
            SessionStateError::Completed => QuizError::Completed,
            SessionStateError::StaleCursor { .. } => QuizError::Conflict,
            other => QuizError::SessionState(other),
        }
    }
}
