//! HTTP surface of the quiz service.
//!
//! ## Endpoints
//! - `GET /` - client page
//! - `GET /next` - current question, starting a session on first use
//! - `POST /answer` - submit `{"answer": "..."}` for the current question
//! - `GET /summary` - tally of a completed session

#![forbid(unsafe_code)]

pub mod dto;
pub mod error;
mod handlers;
pub mod identity;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use identity::{ClientIdentity, SESSION_HEADER};
pub use routes::router;
pub use state::{AppState, SessionKeying};
