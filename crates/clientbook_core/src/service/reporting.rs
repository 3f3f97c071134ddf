//! Reporting and today-view projections.
//!
//! # Responsibility
//! - Filter overdue / due-today entities for the today view.
//! - Bucket order revenue by calendar month, with a year-over-year
//!   comparison column.
//! - Aggregate currency and pipeline-status distributions.
//!
//! # Invariants
//! - All functions are pure over the passed snapshot; expected data
//!   volumes make recompute-on-read the right trade-off.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::model::activity::Task;
use crate::model::company::{Company, PipelineStatus};
use crate::model::order::{Currency, Order};

/// Revenue of one calendar month, with the same month one year earlier
/// when that bucket exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
    pub prior_year_total: Option<Decimal>,
}

/// Orders overdue as of `today` (strictly past due and unpaid).
pub fn overdue_orders<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    today: NaiveDate,
) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|order| order.is_overdue_on(today))
        .collect()
}

/// Orders whose due date is exactly `today` (not yet overdue).
pub fn orders_due_on<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    today: NaiveDate,
) -> Vec<&'a Order> {
    orders
        .into_iter()
        .filter(|order| order.due_date == today && !order.is_fully_paid)
        .collect()
}

/// Open tasks overdue as of `today`.
pub fn overdue_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    today: NaiveDate,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| task.is_overdue_on(today))
        .collect()
}

/// Open tasks due exactly `today`.
pub fn tasks_due_on<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    today: NaiveDate,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| task.due_date == today && !task.is_done)
        .collect()
}

/// Sums order amounts per calendar month of the issued date, oldest
/// month first. Currency is not converted; callers wanting a
/// single-currency chart filter the snapshot first.
pub fn monthly_revenue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for order in orders {
        let key = (order.issued_date.year(), order.issued_date.month());
        *buckets.entry(key).or_insert(Decimal::ZERO) += order.amount;
    }

    buckets
        .iter()
        .map(|(&(year, month), &total)| MonthlyRevenue {
            year,
            month,
            total,
            prior_year_total: buckets.get(&(year - 1, month)).copied(),
        })
        .collect()
}

/// Total order amount per currency.
pub fn revenue_by_currency<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
) -> BTreeMap<Currency, Decimal> {
    let mut totals = BTreeMap::new();
    for order in orders {
        *totals.entry(order.currency).or_insert(Decimal::ZERO) += order.amount;
    }
    totals
}

/// Number of companies per pipeline status.
pub fn companies_by_status<'a>(
    companies: impl IntoIterator<Item = &'a Company>,
) -> BTreeMap<PipelineStatus, usize> {
    let mut counts = BTreeMap::new();
    for company in companies {
        *counts.entry(company.pipeline_status).or_insert(0) += 1;
    }
    counts
}
