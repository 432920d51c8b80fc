//! Server-side sessions and cookie authentication for HTTP services.
//!
//! The crate is built around the [`Store`](store::Store) trait, a small
//! contract over session persistence with two implementations:
//!
//! | Store | Description |
//! |-------|-------------|
//! | [`MemoryStore`](store::MemoryStore) | Process-local map behind a reader/writer lock |
//! | [`BackendStore`](store::BackendStore) | Adapter over an external [`Collection`](store::Collection) |
//!
//! [`gate::authenticate`] decides whether a request carrying a session cookie
//! is let through. With the `axum_api` feature the same decision is exposed
//! as middleware in [`api::axum`].

pub mod actions;
#[cfg(feature = "axum_api")]
pub mod api;
pub mod config;
pub mod gate;
pub mod session;
#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;
pub mod store;
#[cfg(all(test, feature = "tracing"))]
mod span_recorder;

use std::fmt;

pub use config::{SameSite, SessionConfig};
pub use session::{InvalidObjectId, ObjectId, Session, UserSession};
#[cfg(any(test, feature = "mocks"))]
pub use store::MockCollection;
pub use store::{BackendStore, Collection, MemoryStore, SessionFactory, Store};

/// Failures reported by a [`Store`].
///
/// A missing session is not an error: lookups return `Ok(false)` or
/// `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An entry for this id already exists; nothing was written.
    DuplicateId(String),
    /// The id is not in the format the backend keys on.
    InvalidId(String),
    /// The backing service could not complete the operation.
    Backend(String),
    /// A session could not be encoded for, or rebuilt from, the backend.
    Serialization(String),
}

impl std::error::Error for StoreError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // ids are bearer credentials and stay out of messages
            StoreError::DuplicateId(_) => write!(f, "Session id already exists"),
            StoreError::InvalidId(_) => write!(f, "Invalid session id"),
            StoreError::Backend(msg) => write!(f, "Session backend error: {msg}"),
            StoreError::Serialization(msg) => write!(f, "Session serialization error: {msg}"),
        }
    }
}

/// Reasons a request fails to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie, or an empty one.
    MissingCookie,
    /// The cookie names a session the store does not hold.
    UnknownSession,
    /// The store failed while resolving the session.
    Store(StoreError),
    /// The session id contains bytes a cookie value cannot carry.
    InvalidCookieValue,
    /// Middleware or state was wired incorrectly.
    ConfigurationError(String),
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCookie => write!(f, "Missing session cookie"),
            AuthError::UnknownSession => write!(f, "Unknown session"),
            AuthError::Store(err) => write!(f, "{err}"),
            AuthError::InvalidCookieValue => {
                write!(f, "Session id cannot be carried in a cookie")
            }
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err)
    }
}
