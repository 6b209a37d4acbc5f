use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use services::QuizError;
use thiserror::Error;
use tracing::error;

use crate::dto::ErrorBody;

/// Handler failure, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("client address unavailable; serve with connect info to key by address")]
    ClientAddressUnavailable,
}

impl ApiError {
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Quiz(QuizError::NotStarted) => (StatusCode::BAD_REQUEST, "Session not started"),
            ApiError::Quiz(QuizError::EmptyAnswer) => {
                (StatusCode::BAD_REQUEST, "No answer provided!")
            }
            ApiError::Quiz(QuizError::Completed) => (StatusCode::CONFLICT, "Session already complete"),
            ApiError::Quiz(QuizError::NotComplete) => (StatusCode::CONFLICT, "Session not complete"),
            ApiError::Quiz(QuizError::Conflict) => (
                StatusCode::CONFLICT,
                "Answer already recorded for this question",
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: message.to_owned(),
            }),
        )
            .into_response()
    }
}
