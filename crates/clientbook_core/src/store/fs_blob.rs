//! Filesystem blob store for contact photos.
//!
//! # Responsibility
//! - Store one image file per contact under a device-local documents
//!   directory, named by the caller-supplied generated filename.
//!
//! # Invariants
//! - Filenames are flat; no subdirectories are created under the root.
//! - Deleting a missing blob succeeds silently.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::store::{BlobStore, StoreResult};

/// Blob store rooted at a documents directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates the root directory if needed and returns the store.
    pub fn try_new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        // Strip any path components so a malformed name cannot escape root.
        let file_name = Path::new(name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| name.into());
        self.root.join(file_name)
    }
}

impl BlobStore for FsBlobStore {
    fn save_blob(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        fs::write(self.blob_path(name), bytes)?;
        Ok(())
    }

    fn load_blob(&self, name: &str) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.blob_path(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn blob_exists(&self, name: &str) -> bool {
        self.blob_path(name).is_file()
    }

    fn delete_blob(&self, name: &str) -> StoreResult<()> {
        match fs::remove_file(self.blob_path(name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
