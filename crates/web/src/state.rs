use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use services::QuizService;

/// How requests are mapped to sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKeying {
    /// Server-issued token echoed back in the `x-session-id` header.
    #[default]
    Token,
    /// Client IP address; clients behind one address share a session.
    RemoteAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyingError(String);

impl fmt::Display for ParseKeyingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown keying {:?}, expected `token` or `address`", self.0)
    }
}

impl std::error::Error for ParseKeyingError {}

impl FromStr for SessionKeying {
    type Err = ParseKeyingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "address" | "addr" | "ip" => Ok(Self::RemoteAddr),
            _ => Err(ParseKeyingError(s.to_owned())),
        }
    }
}

impl fmt::Display for SessionKeying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
            Self::RemoteAddr => f.write_str("address"),
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub quiz: Arc<QuizService>,
    pub keying: SessionKeying,
}

impl AppState {
    #[must_use]
    pub fn new(quiz: Arc<QuizService>, keying: SessionKeying) -> Self {
        Self { quiz, keying }
    }
}
