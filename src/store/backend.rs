//! Adapter from [`Store`] onto an external document collection.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Store;
use crate::StoreError;
use crate::session::{ObjectId, Session};

/// A persistent collection of session documents keyed by [`ObjectId`].
///
/// Implement this trait for custom storage (mongo, postgres, redis, ...).
/// Implementations own atomicity: [`insert`](Collection::insert) must fail
/// with [`StoreError::DuplicateId`] rather than overwrite, including when two
/// inserts for one key race.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Number of documents stored under `id` (0 or 1).
    async fn count_id(&self, id: &ObjectId) -> Result<u64, StoreError>;

    async fn find_id(&self, id: &ObjectId) -> Result<Option<Value>, StoreError>;

    async fn insert(&self, id: &ObjectId, document: Value) -> Result<(), StoreError>;

    /// Deleting a missing key is not an error.
    async fn remove_id(&self, id: &ObjectId) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Rebuilds a concrete session from a stored document.
pub type SessionFactory<S> = Arc<dyn Fn(Value) -> Result<S, StoreError> + Send + Sync>;

/// [`Store`] that delegates every operation to a [`Collection`].
///
/// Session ids must be 24-character hex [`ObjectId`]s. Ids that do not
/// parse are treated as absent by lookups and removals, and rejected by
/// [`add`](Store::add) with [`StoreError::InvalidId`].
///
/// Hex parsing ignores case, so `"5F1D..."` and `"5f1d..."` name the same
/// document. [`get`](Store::get) returns whatever the factory builds from
/// that document; the rebuilt session's [`id`](Session::id) is the stored
/// lowercase form and need not equal the string passed in.
///
/// The factory passed to [`new`](BackendStore::new) decides which concrete
/// session a document becomes, so one collection can hold several payload
/// shapes behind an enum.
///
/// # Example
///
/// ```rust,ignore
/// use sessionward::store::BackendStore;
/// use sessionward::sqlite::SqliteCollection;
/// use sessionward::UserSession;
///
/// let store = BackendStore::<_, UserSession>::with_serde(SqliteCollection::new(pool));
/// ```
pub struct BackendStore<C, S> {
    collection: C,
    factory: SessionFactory<S>,
    _marker: PhantomData<fn() -> S>,
}

impl<C, S> BackendStore<C, S>
where
    C: Collection,
    S: Session + Serialize,
{
    pub fn new<F>(collection: C, factory: F) -> Self
    where
        F: Fn(Value) -> Result<S, StoreError> + Send + Sync + 'static,
    {
        Self {
            collection,
            factory: Arc::new(factory),
            _marker: PhantomData,
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }
}

impl<C, S> BackendStore<C, S>
where
    C: Collection,
    S: Session + Serialize + DeserializeOwned,
{
    /// Uses `S`'s `Deserialize` impl as the factory.
    pub fn with_serde(collection: C) -> Self {
        Self::new(collection, |document| {
            serde_json::from_value(document).map_err(|e| StoreError::Serialization(e.to_string()))
        })
    }
}

impl<C: Clone, S> Clone for BackendStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            factory: Arc::clone(&self.factory),
            _marker: PhantomData,
        }
    }
}

impl<C: fmt::Debug, S> fmt::Debug for BackendStore<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendStore")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

fn parse_key(id: &str) -> Option<ObjectId> {
    match ObjectId::parse_str(id) {
        Ok(key) => Some(key),
        Err(_) => {
            log::debug!(target: "sessionward", "msg=\"malformed session id\" len={}", id.len());
            None
        }
    }
}

fn log_backend_error(operation: &str, err: &StoreError) {
    if matches!(err, StoreError::Backend(_)) {
        log::error!(target: "sessionward", "msg=\"backend error\", operation=\"{operation}\", error=\"{err}\"");
    }
}

#[async_trait]
impl<C, S> Store for BackendStore<C, S>
where
    C: Collection,
    S: Session + Serialize,
{
    type Session = S;

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, id), err))]
    async fn has(&self, id: &str) -> Result<bool, StoreError> {
        let Some(key) = parse_key(id) else {
            return Ok(false);
        };

        let count = self
            .collection
            .count_id(&key)
            .await
            .inspect_err(|e| log_backend_error("has", e))?;
        Ok(count > 0)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, id), err))]
    async fn get(&self, id: &str) -> Result<Option<Arc<S>>, StoreError> {
        let Some(key) = parse_key(id) else {
            return Ok(None);
        };

        let Some(document) = self
            .collection
            .find_id(&key)
            .await
            .inspect_err(|e| log_backend_error("get", e))?
        else {
            return Ok(None);
        };

        let session = (self.factory)(document)?;
        Ok(Some(Arc::new(session)))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn add(&self, session: S) -> Result<(), StoreError> {
        let key = ObjectId::parse_str(session.id())
            .map_err(|_| StoreError::InvalidId(session.id().to_owned()))?;

        let document =
            serde_json::to_value(&session).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.collection
            .insert(&key, document)
            .await
            .inspect_err(|e| log_backend_error("add", e))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, id), err))]
    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let Some(key) = parse_key(id) else {
            return Ok(());
        };

        self.collection
            .remove_id(&key)
            .await
            .inspect_err(|e| log_backend_error("remove", e))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn len(&self) -> Result<usize, StoreError> {
        let count = self
            .collection
            .count()
            .await
            .inspect_err(|e| log_backend_error("len", e))?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }
}


#[cfg(all(test, feature = "tracing"))]
mod span_tests {
    use chrono::Duration;

    use super::*;
    use crate::session::UserSession;
    use crate::span_recorder::SpanRecorder;
    use crate::store::MockCollection;

    #[test]
    fn test_spans_never_carry_session_ids() {
        let recorder = SpanRecorder::default();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let session = UserSession::new(5, Duration::hours(1));
        let id = session.id.clone();

        tracing::subscriber::with_default(recorder.clone(), || {
            runtime.block_on(async {
                let store = BackendStore::<_, UserSession>::with_serde(MockCollection::new());
                store.add(session.clone()).await.unwrap();
                assert!(store.add(session).await.is_err());
                store.has(&id).await.unwrap();
                store.get(&id).await.unwrap();
                store.remove(&id).await.unwrap();

                store.collection().set_unavailable(true);
                assert!(store.has(&id).await.is_err());
                assert!(store.get(&id).await.is_err());
            });
        });

        let names = recorder.span_names();
        for name in ["has", "get", "add", "remove"] {
            assert!(names.iter().any(|n| n == name), "no {name} span in {names:?}");
        }
        for line in recorder.lines() {
            assert!(!line.contains(&id), "session id recorded: {line}");
            assert!(!line.contains("field:id"), "id field declared: {line}");
        }
    }
}
