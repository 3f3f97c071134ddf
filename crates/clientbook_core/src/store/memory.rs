//! In-memory persistence doubles.
//!
//! # Responsibility
//! - Provide map-backed `CollectionStore`/`BlobStore` implementations for
//!   tests and previews, including write-failure injection.
//!
//! # Invariants
//! - Single-threaded use only, matching the repository's execution model.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::store::{BlobStore, CollectionStore, StoreError, StoreResult};

/// Map-backed collection store.
#[derive(Default)]
pub struct MemoryCollectionStore {
    snapshots: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every subsequent `save` fails with `WriteRejected`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Snapshot currently held for a collection, for test assertions.
    pub fn snapshot(&self, collection: &str) -> Option<String> {
        self.snapshots.borrow().get(collection).cloned()
    }

    /// Pre-seeds a snapshot, bypassing the save path.
    pub fn seed(&self, collection: &str, payload: &str) {
        self.snapshots
            .borrow_mut()
            .insert(collection.to_string(), payload.to_string());
    }
}

impl CollectionStore for MemoryCollectionStore {
    fn save(&self, collection: &str, payload: &str) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::WriteRejected);
        }
        self.snapshots
            .borrow_mut()
            .insert(collection.to_string(), payload.to_string());
        Ok(())
    }

    fn load(&self, collection: &str) -> StoreResult<Option<String>> {
        Ok(self.snapshots.borrow().get(collection).cloned())
    }
}

/// Map-backed blob store.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.borrow().len()
    }
}

impl BlobStore for MemoryBlobStore {
    fn save_blob(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        self.blobs
            .borrow_mut()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load_blob(&self, name: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.blobs.borrow().get(name).cloned())
    }

    fn blob_exists(&self, name: &str) -> bool {
        self.blobs.borrow().contains_key(name)
    }

    fn delete_blob(&self, name: &str) -> StoreResult<()> {
        self.blobs.borrow_mut().remove(name);
        Ok(())
    }
}
