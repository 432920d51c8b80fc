//! Session storage.
//!
//! [`Store`] is the contract every backend satisfies:
//! - [`MemoryStore`]: in-process map, lost on restart
//! - [`BackendStore`]: delegates to an external [`Collection`]
//!
//! Implement [`Collection`] to plug in your own database.

mod backend;
#[cfg(any(test, feature = "mocks"))]
mod collection_mock;
mod memory_store;

use std::sync::Arc;

use async_trait::async_trait;

#[cfg(any(test, feature = "mocks"))]
pub use collection_mock::MockCollection;
pub use backend::{BackendStore, Collection, SessionFactory};
pub use memory_store::MemoryStore;

use crate::StoreError;
use crate::session::Session;

/// Keyed storage for sessions.
///
/// Keys are session ids and are unique: [`add`](Store::add) never
/// overwrites, even when called concurrently for the same id.
#[async_trait]
pub trait Store: Send + Sync {
    type Session: Session;

    /// Returns whether a session with this id is stored.
    async fn has(&self, id: &str) -> Result<bool, StoreError>;

    /// Returns the stored session, or `None` if there is none.
    async fn get(&self, id: &str) -> Result<Option<Arc<Self::Session>>, StoreError>;

    /// Inserts a session.
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is already present,
    /// in which case nothing is written.
    async fn add(&self, session: Self::Session) -> Result<(), StoreError>;

    /// Deletes the session if present. Removing an absent id is not an error.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Number of stored sessions.
    async fn len(&self) -> Result<usize, StoreError>;

    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    type Session = T::Session;

    async fn has(&self, id: &str) -> Result<bool, StoreError> {
        (**self).has(id).await
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<Self::Session>>, StoreError> {
        (**self).get(id).await
    }

    async fn add(&self, session: Self::Session) -> Result<(), StoreError> {
        (**self).add(session).await
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        (**self).remove(id).await
    }

    async fn len(&self) -> Result<usize, StoreError> {
        (**self).len().await
    }
}
