use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/next", get(handlers::next_question))
        .route("/answer", post(handlers::submit_answer))
        .route("/summary", get(handlers::summary))
        .with_state(state)
}
