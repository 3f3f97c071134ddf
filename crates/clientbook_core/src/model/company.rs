//! Company (account) domain model.
//!
//! # Responsibility
//! - Define the top-level browsing record and its classification enums.
//! - Map payment terms to the day offset used for order due dates.
//!
//! # Invariants
//! - Every ID in a child-ID list references an existing entity of that
//!   type; the repository is the only writer of these lists.
//! - Deleting a company deletes every referenced child (cascade).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::country::Country;
use crate::model::EntityId;

/// Commercial classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Distributor,
    Reseller,
    KeyOpinionLeader,
    Brand,
}

/// Sales pipeline stage of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    ActiveClient,
    WarmLead,
    ColdLead,
    Ghosting,
    ClosedLost,
}

/// Agreed payment terms for an account.
///
/// The numeric suffix is the day offset added to an order's issued date
/// to derive its due date. `Days61` is a real contractual term (end of
/// second month), not a typo for 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTerms {
    PrePay,
    Days15,
    Days30,
    Days60,
    Days61,
    Days90,
    Days120,
    Days180,
    Days360,
}

impl PaymentTerms {
    /// Day offset between an order's issued date and its due date.
    pub fn day_offset(self) -> u64 {
        match self {
            Self::PrePay => 0,
            Self::Days15 => 15,
            Self::Days30 => 30,
            Self::Days60 => 60,
            Self::Days61 => 61,
            Self::Days90 => 90,
            Self::Days120 => 120,
            Self::Days180 => 180,
            Self::Days360 => 360,
        }
    }
}

/// A sales prospect or client organization being tracked.
///
/// Child-ID lists are ordered (insertion order) and must only be mutated
/// through repository operations, which keep both linkage sides in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    pub business_type: BusinessType,
    pub payment_terms: PaymentTerms,
    pub country: Country,
    pub pipeline_status: PipelineStatus,
    pub website: String,
    pub notes: String,
    #[serde(default)]
    pub contact_ids: Vec<EntityId>,
    #[serde(default)]
    pub order_ids: Vec<EntityId>,
    #[serde(default)]
    pub interaction_ids: Vec<EntityId>,
    #[serde(default)]
    pub task_ids: Vec<EntityId>,
}

impl Company {
    /// Creates a company with a generated stable ID and empty child lists.
    pub fn new(
        name: impl Into<String>,
        business_type: BusinessType,
        payment_terms: PaymentTerms,
        country: Country,
        pipeline_status: PipelineStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            business_type,
            payment_terms,
            country,
            pipeline_status,
            website: String::new(),
            notes: String::new(),
            contact_ids: Vec::new(),
            order_ids: Vec::new(),
            interaction_ids: Vec::new(),
            task_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PaymentTerms;

    #[test]
    fn payment_terms_map_to_expected_day_offsets() {
        assert_eq!(PaymentTerms::PrePay.day_offset(), 0);
        assert_eq!(PaymentTerms::Days15.day_offset(), 15);
        assert_eq!(PaymentTerms::Days30.day_offset(), 30);
        assert_eq!(PaymentTerms::Days61.day_offset(), 61);
        assert_eq!(PaymentTerms::Days360.day_offset(), 360);
    }

    #[test]
    fn payment_terms_serialize_with_stable_encoding() {
        let encoded = serde_json::to_string(&PaymentTerms::Days30).unwrap();
        assert_eq!(encoded, "\"days30\"");
        let decoded: PaymentTerms = serde_json::from_str("\"pre_pay\"").unwrap();
        assert_eq!(decoded, PaymentTerms::PrePay);
    }
}
