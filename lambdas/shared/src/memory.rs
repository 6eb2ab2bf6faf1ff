//! In-memory object store
//!
//! Behaves like a bucket with event notifications enabled: every write
//! records an [`ObjectCreated`] that callers drain and feed to an
//! [`EventRouter`](crate::events::EventRouter). Used to run the pipeline end
//! to end without S3.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::events::ObjectCreated;
use crate::storage::ObjectStore;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
struct State {
    objects: HashMap<(String, String), StoredObject>,
    pending: Vec<ObjectCreated>,
    writes: usize,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    state: Mutex<State>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }

    /// Object-created events recorded since the last call
    pub fn take_events(&self) -> Result<Vec<ObjectCreated>> {
        Ok(std::mem::take(&mut self.lock()?.pending))
    }

    /// Current object, if any
    pub fn object(&self, bucket: &str, key: &str) -> Result<Option<StoredObject>> {
        Ok(self
            .lock()?
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned())
    }

    /// Sorted keys under `prefix`
    pub fn keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let state = self.lock()?;
        let mut keys: Vec<String> = state
            .objects
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Total number of puts and copies, overwrites included
    pub fn write_count(&self) -> Result<usize> {
        Ok(self.lock()?.writes)
    }

    fn insert(&self, bucket: &str, key: &str, object: StoredObject) -> Result<()> {
        let mut state = self.lock()?;
        state
            .objects
            .insert((bucket.to_string(), key.to_string()), object);
        state.writes += 1;
        state.pending.push(ObjectCreated::new(bucket, key));
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.insert(
            bucket,
            key,
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        )
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.object(bucket, key)?
            .map(|object| object.body)
            .ok_or_else(|| Error::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()> {
        let object = self
            .object(bucket, source_key)?
            .ok_or_else(|| Error::ObjectNotFound {
                bucket: bucket.to_string(),
                key: source_key.to_string(),
            })?;
        self.insert(bucket, dest_key, object)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.lock()?
            .objects
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
