//! In-memory session storage.
//!
//! Suitable for development, testing, and single-instance deployments.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::Store;
use crate::StoreError;
use crate::session::Session;

/// In-memory session storage.
///
/// Stores sessions in a `HashMap` protected by a `RwLock`, keyed by session
/// id. Lookups share the read lock; [`add`](Store::add) and
/// [`remove`](Store::remove) hold the write lock for the whole
/// check-and-mutate step, so two concurrent adds of one id cannot both win.
///
/// Clones share the same map.
///
/// # Note
///
/// Sessions are lost when the process restarts and nothing is ever evicted.
pub struct MemoryStore<S> {
    sessions: Arc<RwLock<HashMap<String, Arc<S>>>>,
}

impl<S> MemoryStore<S> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<S> Default for MemoryStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for MemoryStore<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S> fmt::Debug for MemoryStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.sessions.read().map(|guard| guard.len()).ok();
        f.debug_struct("MemoryStore").field("len", &len).finish()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("Lock poisoned".to_owned())
}

#[async_trait]
impl<S: Session> Store for MemoryStore<S> {
    type Session = S;

    async fn has(&self, id: &str) -> Result<bool, StoreError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.contains_key(id))
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<S>>, StoreError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.get(id).cloned())
    }

    #[allow(clippy::significant_drop_tightening)]
    async fn add(&self, session: S) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;

        match sessions.entry(session.id().to_owned()) {
            Entry::Occupied(entry) => {
                log::debug!(target: "sessionward", "msg=\"duplicate session id\" store=\"memory\"");
                Err(StoreError::DuplicateId(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(session));
                Ok(())
            }
        }
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .remove(id);

        Ok(())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::session::UserSession;

    fn new_session() -> UserSession {
        UserSession::new(1, Duration::hours(2))
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = MemoryStore::new();
        let session = new_session();
        let id = session.id.clone();

        store.add(session).await.unwrap();

        assert!(store.has(&id).await.unwrap());
        let found = store.get(&id).await.unwrap().unwrap();
        assert_eq!(found.id(), id);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_rejected() {
        let store = MemoryStore::new();
        let session = new_session();
        let id = session.id.clone();

        store.add(session.clone()).await.unwrap();
        let result = store.add(session).await;

        assert_eq!(result, Err(StoreError::DuplicateId(id)));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_does_not_overwrite() {
        let store = MemoryStore::new();
        let original = new_session();
        let mut replacement = original.clone();
        replacement.user_id = 99;

        store.add(original.clone()).await.unwrap();
        assert!(store.add(replacement).await.is_err());

        let found = store.get(&original.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::<UserSession>::new();

        assert!(!store.has("nonexistent").await.unwrap());
        assert!(store.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_returns_stored_instance() {
        let store = MemoryStore::new();
        let session = new_session();
        let id = session.id.clone();
        store.add(session).await.unwrap();

        let first = store.get(&id).await.unwrap().unwrap();
        let second = store.get(&id).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        let session = new_session();
        let id = session.id.clone();
        store.add(session).await.unwrap();

        store.remove(&id).await.unwrap();
        assert!(!store.has(&id).await.unwrap());

        store.remove(&id).await.unwrap();
        store.remove("never-added").await.unwrap();
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let store = MemoryStore::new();
        let clone = store.clone();
        let session = new_session();
        let id = session.id.clone();

        clone.add(session).await.unwrap();
        assert!(store.has(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_mixed_session_payloads() {
        struct ApiKeySession(String);

        impl Session for ApiKeySession {
            fn id(&self) -> &str {
                &self.0
            }

            fn is_out_of_date(&self) -> bool {
                false
            }
        }

        let store: MemoryStore<Box<dyn Session>> = MemoryStore::new();
        store.add(Box::new(new_session())).await.unwrap();
        store
            .add(Box::new(ApiKeySession("key-1".to_owned())))
            .await
            .unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        assert_eq!(store.get("key-1").await.unwrap().unwrap().id(), "key-1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_adds_have_one_winner() {
        let store = MemoryStore::new();
        let session = new_session();

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                let session = session.clone();
                tokio::spawn(async move { store.add(session).await })
            })
            .collect();

        let mut wins = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => wins += 1,
                Err(StoreError::DuplicateId(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(duplicates, 63);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
