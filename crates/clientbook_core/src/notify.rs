//! Due-date notification collaborator boundary.
//!
//! # Responsibility
//! - Define the fire-and-forget scheduling contract the repository calls
//!   for date-bearing entities (orders and tasks).
//!
//! # Invariants
//! - The repository never awaits or inspects scheduling results; a
//!   scheduler must not fail a mutation.

use crate::model::activity::Task;
use crate::model::order::Order;

/// External notification scheduler consumed by the repository.
///
/// Called on every add and update of an order or task so edits to a due
/// date keep pending notifications current.
pub trait NotificationScheduler {
    fn schedule_order_due(&self, order: &Order);
    fn schedule_task_due(&self, task: &Task);
}

impl<T: NotificationScheduler + ?Sized> NotificationScheduler for &T {
    fn schedule_order_due(&self, order: &Order) {
        (**self).schedule_order_due(order);
    }

    fn schedule_task_due(&self, task: &Task) {
        (**self).schedule_task_due(task);
    }
}

/// Default scheduler that only records the request in the log.
///
/// Hosts that wire a real notification service replace this.
pub struct LogOnlyScheduler;

impl NotificationScheduler for LogOnlyScheduler {
    fn schedule_order_due(&self, order: &Order) {
        log::info!(
            "event=notification_request module=notify kind=order id={} due_date={}",
            order.id,
            order.due_date
        );
    }

    fn schedule_task_due(&self, task: &Task) {
        log::info!(
            "event=notification_request module=notify kind=task id={} due_date={}",
            task.id,
            task.due_date
        );
    }
}
