//! Interaction, task and note domain models.
//!
//! # Responsibility
//! - Define the date-bearing activity records attached to companies and
//!   contacts.
//!
//! # Invariants
//! - Tasks derive overdue state from the due date and done flag only.
//! - Notes attach to contacts, never to companies, and are not listed in
//!   any parent child-ID array.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{CompanyOwned, EntityId};

/// A logged touchpoint with a company (call, meeting, email thread).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: EntityId,
    pub date: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub company_id: Option<EntityId>,
}

impl Interaction {
    pub fn new(date: DateTime<Utc>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            title: title.into(),
            content: content.into(),
            company_id: None,
        }
    }
}

impl CompanyOwned for Interaction {
    fn company_id(&self) -> Option<EntityId> {
        self.company_id
    }
}

/// A follow-up item with a due date, attached to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub due_date: NaiveDate,
    pub is_done: bool,
    pub completed_date: Option<NaiveDate>,
    pub company_id: Option<EntityId>,
}

impl Task {
    pub fn new(title: impl Into<String>, content: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            due_date,
            is_done: false,
            completed_date: None,
            company_id: None,
        }
    }

    /// Whether this task is overdue relative to the given calendar day.
    ///
    /// Same strict boundary as orders: due today is not overdue.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.is_done
    }

    /// Overdue state against the start of today in the local calendar.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Local::now().date_naive())
    }
}

impl CompanyOwned for Task {
    fn company_id(&self) -> Option<EntityId> {
        self.company_id
    }
}

/// A free-text note attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    pub date: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub contact_id: EntityId,
}

impl Note {
    pub fn new(
        date: DateTime<Utc>,
        title: impl Into<String>,
        content: impl Into<String>,
        contact_id: EntityId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            title: title.into(),
            content: content.into(),
            contact_id,
        }
    }
}
