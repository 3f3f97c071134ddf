//! Persistence backend boundary.
//!
//! # Responsibility
//! - Define the swappable contracts the repository persists through:
//!   whole-collection JSON snapshots and per-contact image blobs.
//! - Name the six logical collections.
//!
//! # Invariants
//! - `save` semantics are overwrite-the-snapshot, never append.
//! - Implementations report failures through `StoreError`; deciding that
//!   a failed load means "no data" is the repository's call, not theirs.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;

mod fs_blob;
mod memory;
mod sqlite;

pub use fs_blob::FsBlobStore;
pub use memory::{MemoryBlobStore, MemoryCollectionStore};
pub use sqlite::SqliteCollectionStore;

/// Logical collection names, one per entity type.
pub mod collections {
    pub const COMPANIES: &str = "companies";
    pub const CONTACTS: &str = "contacts";
    pub const ORDERS: &str = "orders";
    pub const INTERACTIONS: &str = "interactions";
    pub const TASKS: &str = "tasks";
    pub const NOTES: &str = "notes";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a persistence backend implementation.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Io(std::io::Error),
    /// Backend was handed a connection without the expected schema.
    UninitializedDb {
        expected_version: u32,
        actual_version: u32,
    },
    /// Injected failure from a test double.
    WriteRejected,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::UninitializedDb {
                expected_version,
                actual_version,
            } => write!(
                f,
                "collection store requires schema version {expected_version}, connection has {actual_version}"
            ),
            Self::WriteRejected => write!(f, "write rejected by store"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Durable key-value store of JSON-serialized collection snapshots.
pub trait CollectionStore {
    /// Durably writes the complete snapshot of one collection,
    /// replacing any previous snapshot under that name.
    fn save(&self, collection: &str, payload: &str) -> StoreResult<()>;

    /// Reads back the last saved snapshot, `None` if never saved.
    fn load(&self, collection: &str) -> StoreResult<Option<String>>;
}

impl<T: CollectionStore + ?Sized> CollectionStore for &T {
    fn save(&self, collection: &str, payload: &str) -> StoreResult<()> {
        (**self).save(collection, payload)
    }

    fn load(&self, collection: &str) -> StoreResult<Option<String>> {
        (**self).load(collection)
    }
}

/// Binary image storage keyed by generated filename.
pub trait BlobStore {
    fn save_blob(&self, name: &str, bytes: &[u8]) -> StoreResult<()>;

    /// `None` when no blob exists under that name.
    fn load_blob(&self, name: &str) -> StoreResult<Option<Vec<u8>>>;

    fn blob_exists(&self, name: &str) -> bool;

    /// Removing a missing blob is not an error.
    fn delete_blob(&self, name: &str) -> StoreResult<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn save_blob(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        (**self).save_blob(name, bytes)
    }

    fn load_blob(&self, name: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).load_blob(name)
    }

    fn blob_exists(&self, name: &str) -> bool {
        (**self).blob_exists(name)
    }

    fn delete_blob(&self, name: &str) -> StoreResult<()> {
        (**self).delete_blob(name)
    }
}
