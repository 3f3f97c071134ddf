//! Order domain model.
//!
//! # Responsibility
//! - Define the order record and its currency set.
//! - Derive due dates from payment terms and overdue state from "today".
//!
//! # Invariants
//! - `due_date` is fixed at creation from the owning company's payment
//!   terms; later changes to the company's terms do not rewrite it.
//! - `amount` is non-negative; writes are rejected otherwise.
//! - Overdue means strictly before the start of today and not fully paid.

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::model::company::PaymentTerms;
use crate::model::{CompanyOwned, EntityId};

/// Invoicing currencies supported by order records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
    Usd,
}

impl Currency {
    /// ISO 4217 code, also the serialized encoding.
    pub fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Usd => "USD",
        }
    }
}

/// Validation failure for order writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    /// `amount` must be zero or positive.
    NegativeAmount(Decimal),
}

impl Display for OrderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "order amount must be non-negative, got {amount}")
            }
        }
    }
}

impl Error for OrderValidationError {}

/// Computes an order due date from its issued date and payment terms.
pub fn due_date_for(issued_date: NaiveDate, terms: PaymentTerms) -> NaiveDate {
    issued_date
        .checked_add_days(Days::new(terms.day_offset()))
        .unwrap_or(NaiveDate::MAX)
}

/// A sales order issued to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub issued_date: NaiveDate,
    /// Assigned by the repository at add time from the owning company's
    /// payment terms; see `due_date_for`.
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub currency: Currency,
    /// Free text; uniqueness per company is conventional, not enforced.
    pub order_number: String,
    pub is_fully_paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub company_id: Option<EntityId>,
}

impl Order {
    /// Creates an order with a generated stable ID.
    ///
    /// `due_date` starts equal to `issued_date`; the repository derives
    /// the real due date from the owning company when the order is added.
    pub fn new(
        issued_date: NaiveDate,
        amount: Decimal,
        currency: Currency,
        order_number: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            issued_date,
            due_date: issued_date,
            amount,
            currency,
            order_number: order_number.into(),
            is_fully_paid: false,
            paid_date: None,
            company_id: None,
        }
    }

    /// Rejects records that must not reach persistence.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.amount < Decimal::ZERO {
            return Err(OrderValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }

    /// Whether this order is overdue relative to the given calendar day.
    ///
    /// The boundary is strict: an order due today is not overdue.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.is_fully_paid
    }

    /// Overdue state against the start of today in the local calendar.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Local::now().date_naive())
    }
}

impl CompanyOwned for Order {
    fn company_id(&self) -> Option<EntityId> {
        self.company_id
    }
}

#[cfg(test)]
mod tests {
    use super::{due_date_for, Currency, Order, OrderValidationError};
    use crate::model::company::PaymentTerms;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_adds_the_payment_term_offset() {
        assert_eq!(
            due_date_for(date(2024, 1, 1), PaymentTerms::Days30),
            date(2024, 1, 31)
        );
        assert_eq!(
            due_date_for(date(2024, 1, 1), PaymentTerms::PrePay),
            date(2024, 1, 1)
        );
    }

    #[test]
    fn overdue_boundary_is_strictly_before_today() {
        let mut order = Order::new(date(2024, 3, 1), Decimal::from(100), Currency::Usd, "A-1");
        order.due_date = date(2024, 3, 10);

        assert!(order.is_overdue_on(date(2024, 3, 11)));
        assert!(!order.is_overdue_on(date(2024, 3, 10)));
        assert!(!order.is_overdue_on(date(2024, 3, 9)));

        order.is_fully_paid = true;
        assert!(!order.is_overdue_on(date(2024, 3, 11)));
    }

    #[test]
    fn negative_amounts_fail_validation() {
        let order = Order::new(date(2024, 3, 1), Decimal::from(-1), Currency::Eur, "A-2");
        assert_eq!(
            order.validate(),
            Err(OrderValidationError::NegativeAmount(Decimal::from(-1)))
        );
    }

    #[test]
    fn currency_serializes_as_iso_code() {
        assert_eq!(serde_json::to_string(&Currency::Gbp).unwrap(), "\"GBP\"");
        assert_eq!(Currency::Eur.code(), "EUR");
    }
}
