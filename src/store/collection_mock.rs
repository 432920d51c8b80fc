#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::Collection;
use crate::StoreError;
use crate::session::ObjectId;

/// In-process [`Collection`] for tests.
///
/// [`set_unavailable`](MockCollection::set_unavailable) makes every call
/// fail with [`StoreError::Backend`], as if the database were unreachable.
#[derive(Debug, Clone, Default)]
pub struct MockCollection {
    pub documents: Arc<Mutex<HashMap<ObjectId, Value>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl Collection for MockCollection {
    async fn count_id(&self, id: &ObjectId) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(u64::from(self.documents.lock().unwrap().contains_key(id)))
    }

    async fn find_id(&self, id: &ObjectId) -> Result<Option<Value>, StoreError> {
        self.check_available()?;
        Ok(self.documents.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, id: &ObjectId, document: Value) -> Result<(), StoreError> {
        self.check_available()?;
        let mut documents = self.documents.lock().unwrap();
        if documents.contains_key(id) {
            return Err(StoreError::DuplicateId(id.to_hex()));
        }
        documents.insert(*id, document);
        drop(documents);
        Ok(())
    }

    async fn remove_id(&self, id: &ObjectId) -> Result<(), StoreError> {
        self.check_available()?;
        self.documents.lock().unwrap().remove(id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        let len = self.documents.lock().unwrap().len();
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }
}
