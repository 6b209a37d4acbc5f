use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Response};
use quiz_core::model::SessionKey;
use tracing::debug;

use crate::dto::{AnswerRequest, AnswerResponse, NextResponse, SummaryBody};
use crate::error::ApiError;
use crate::identity::{ClientIdentity, SESSION_HEADER};
use crate::state::{AppState, SessionKeying};
use services::QuizError;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub(crate) async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn next_question(
    State(state): State<AppState>,
    ClientIdentity(claimed): ClientIdentity,
) -> Result<Response, ApiError> {
    let key = match (state.keying, claimed) {
        (SessionKeying::RemoteAddr, Some(key)) => key,
        (SessionKeying::RemoteAddr, None) => return Err(ApiError::ClientAddressUnavailable),
        (SessionKeying::Token, Some(key)) if state.quiz.has_session(&key).await? => key,
        (SessionKeying::Token, _) => SessionKey::generate(),
    };

    let next = state.quiz.next_question(&key).await?;
    let session_id = (state.keying == SessionKeying::Token).then(|| key.to_string());
    let header = session_id
        .as_deref()
        .and_then(|id| HeaderValue::from_str(id).ok());
    let mut response = Json(NextResponse::from_next(next, session_id)).into_response();
    if let Some(value) = header {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    Ok(response)
}

pub(crate) async fn submit_answer(
    State(state): State<AppState>,
    ClientIdentity(claimed): ClientIdentity,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let key = existing_session(&state, claimed)?;
    let request = body.map(|Json(request)| request).unwrap_or_else(|rejection| {
        debug!(%rejection, "unreadable answer body, treating as empty");
        AnswerRequest::default()
    });

    let outcome = state.quiz.submit_answer(&key, &request.answer).await?;
    Ok(Json(AnswerResponse::from(outcome)))
}

pub(crate) async fn summary(
    State(state): State<AppState>,
    ClientIdentity(claimed): ClientIdentity,
) -> Result<Json<SummaryBody>, ApiError> {
    let key = existing_session(&state, claimed)?;
    let summary = state.quiz.summary(&key).await?;
    Ok(Json(SummaryBody::from(&summary)))
}

/// Key of a session the client must already have started.
fn existing_session(
    state: &AppState,
    claimed: Option<SessionKey>,
) -> Result<SessionKey, ApiError> {
    match (state.keying, claimed) {
        (_, Some(key)) => Ok(key),
        (SessionKeying::RemoteAddr, None) => Err(ApiError::ClientAddressUnavailable),
        (SessionKeying::Token, None) => Err(QuizError::NotStarted.into()),
    }
}
