#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    InMemorySessionStore, Inserted, SessionHandle, SessionRepository, StorageError,
};
