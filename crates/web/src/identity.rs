use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use quiz_core::model::SessionKey;

use crate::state::{AppState, SessionKeying};

/// Header carrying the session token in both directions.
pub const SESSION_HEADER: &str = "x-session-id";

/// Session key the request claims, if any.
///
/// In token mode this is the parsed `x-session-id` header; a missing or
/// malformed header yields `None`. In address mode it is the peer IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub Option<SessionKey>);

impl ClientIdentity {
    #[must_use]
    pub fn resolve(
        keying: SessionKeying,
        headers: &HeaderMap,
        remote: Option<SocketAddr>,
    ) -> Self {
        let key = match keying {
            SessionKeying::Token => headers
                .get(SESSION_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|raw| raw.parse::<SessionKey>().ok()),
            SessionKeying::RemoteAddr => remote.map(|addr| SessionKey::from_addr(addr.ip())),
        };
        Self(key)
    }
}

impl FromRequestParts<AppState> for ClientIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::resolve(state.keying, &parts.headers, remote))
    }
}
