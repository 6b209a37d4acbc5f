use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use uuid::Uuid;

/// Opaque identifier for a quiz session.
///
/// Either a server-issued random token or the textual client address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Mints a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Keys a session by the client's network address.
    #[must_use]
    pub fn from_addr(addr: IpAddr) -> Self {
        Self(addr.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey({})", self.0)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for parsing a session key from client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSessionKeyError {
    raw: String,
}

impl fmt::Display for ParseSessionKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid session key: {:?}", self.raw)
    }
}

impl std::error::Error for ParseSessionKeyError {}

const MAX_KEY_LEN: usize = 64;

impl FromStr for SessionKey {
    type Err = ParseSessionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= MAX_KEY_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
        if valid {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(ParseSessionKeyError { raw: s.to_owned() })
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_distinct_and_parseable() {
        let a = SessionKey::generate();
        let b = SessionKey::generate();
        assert_ne!(a, b);
        let parsed: SessionKey = a.to_string().parse().unwrap();
        assert_eq!(parsed, a);
    }

    #[test]
    fn address_keys_cover_v4_and_v6() {
        let v4 = SessionKey::from_addr("10.0.0.7".parse().unwrap());
        assert_eq!(v4.as_str(), "10.0.0.7");
        let v6 = SessionKey::from_addr("::1".parse().unwrap());
        assert_eq!(v6.as_str(), "::1");
    }

    #[test]
    fn rejects_blank_or_odd_keys() {
        assert!("".parse::<SessionKey>().is_err());
        assert!("   ".parse::<SessionKey>().is_err());
        assert!("has space".parse::<SessionKey>().is_err());
        assert!("x".repeat(65).parse::<SessionKey>().is_err());
    }
}
