//! Repository layer: the in-memory source of truth.
//!
//! # Responsibility
//! - Own every entity collection and funnel all mutations through one
//!   type so dual linkage (parent ID lists + child back-references)
//!   stays consistent.
//! - Persist the full collection set after each mutation and notify
//!   subscribed observers.
//!
//! # Invariants
//! - No caller can mutate child-ID lists directly; only repository
//!   operations touch them.
//! - Persistence failures never roll back in-memory state.

pub mod crm_repo;
