//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `clientbook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use clientbook_core::{
    CrmRepository, LogOnlyScheduler, MemoryBlobStore, MemoryCollectionStore,
};

fn main() {
    let repo = CrmRepository::open(
        MemoryCollectionStore::new(),
        MemoryBlobStore::new(),
        LogOnlyScheduler,
    );
    println!("clientbook_core version={}", clientbook_core::core_version());
    println!("clientbook_core companies={}", repo.companies().len());
}
