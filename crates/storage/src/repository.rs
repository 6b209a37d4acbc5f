use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Session, SessionKey};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by session stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("session store lock poisoned: {0}")]
    Poisoned(String),
}

/// Shared, individually locked session.
///
/// Each session carries its own async mutex so requests for different clients
/// never contend, and a slow request only blocks its own session.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Result of `SessionRepository::insert_if_absent`.
#[derive(Debug, Clone)]
pub struct Inserted {
    pub handle: SessionHandle,
    /// `false` when another caller had already stored a session under the key.
    pub created: bool,
}

/// Store contract for live quiz sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch the session for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get(&self, key: &SessionKey) -> Result<Option<SessionHandle>, StorageError>;

    /// Store `session` under `key` unless one already exists.
    ///
    /// Returns the handle that ends up stored; an existing session is never replaced.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn insert_if_absent(
        &self,
        key: SessionKey,
        session: Session,
    ) -> Result<Inserted, StorageError>;

    /// Drop sessions last used before `cutoff`. Sessions in use are kept.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError>;

    /// Number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn len(&self) -> Result<usize, StorageError>;
}

/// Process-lifetime session store.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionKey, SessionHandle>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Option<SessionHandle>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn insert_if_absent(
        &self,
        key: SessionKey,
        session: Session,
    ) -> Result<Inserted, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        let inserted = match guard.entry(key) {
            Entry::Occupied(entry) => Inserted {
                handle: Arc::clone(entry.get()),
                created: false,
            },
            Entry::Vacant(entry) => Inserted {
                handle: Arc::clone(entry.insert(Arc::new(tokio::sync::Mutex::new(session)))),
                created: true,
            },
        };
        Ok(inserted)
    }

    async fn evict_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        let before = guard.len();
        guard.retain(|_, handle| {
            // Another request holds a clone: it is mid-flight, keep it.
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => session.last_active_at() >= cutoff,
                Err(_) => true,
            }
        });
        Ok(before - guard.len())
    }

    async fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(guard.len())
    }
}
