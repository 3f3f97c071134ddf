//! Normalized CRM domain model.
//!
//! # Responsibility
//! - Define canonical entity records owned by the repository.
//! - Keep parent/child linkage explicit: parents hold ordered child-ID
//!   lists, children hold a nullable owning-company back-reference.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`, assigned at
//!   creation and never reused.
//! - Derived flags (`is_overdue`) are computed, never persisted.

use uuid::Uuid;

pub mod activity;
pub mod company;
pub mod contact;
pub mod country;
pub mod order;

/// Stable identifier shared by every CRM entity.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = Uuid;

/// Access to the owning-company back-reference shared by company children.
///
/// `None` means the link is unset (only expected transiently, before the
/// repository wires the record into a company).
pub trait CompanyOwned {
    fn company_id(&self) -> Option<EntityId>;
}
