//! Core data layer for Clientbook, a small-business sales CRM.
//! This crate is the single source of truth for business invariants:
//! entity linkage, cascade deletion, due-date derivation and the
//! persist-on-every-mutation contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Interaction, Note, Task};
pub use model::company::{BusinessType, Company, PaymentTerms, PipelineStatus};
pub use model::contact::{Contact, DEFAULT_AVATARS};
pub use model::country::Country;
pub use model::order::{Currency, Order, OrderValidationError};
pub use model::{CompanyOwned, EntityId};
pub use notify::{LogOnlyScheduler, NotificationScheduler};
pub use repo::crm_repo::{
    CrmRepository, EntityKind, ReferentialMode, RepoError, RepoResult, UNKNOWN_COMPANY,
};
pub use store::{
    BlobStore, CollectionStore, FsBlobStore, MemoryBlobStore, MemoryCollectionStore,
    SqliteCollectionStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
