use std::cell::RefCell;

use chrono::NaiveDate;
use clientbook_core::{
    BusinessType, Company, Country, CrmRepository, Currency, EntityId, MemoryBlobStore,
    MemoryCollectionStore, NotificationScheduler, Order, PaymentTerms, PipelineStatus,
    ReferentialMode, RepoError, Task,
};
use rust_decimal::Decimal;

/// Captures scheduling requests so tests can assert on them.
#[derive(Default)]
struct RecordingScheduler {
    orders: RefCell<Vec<(EntityId, NaiveDate)>>,
    tasks: RefCell<Vec<(EntityId, NaiveDate)>>,
}

impl NotificationScheduler for RecordingScheduler {
    fn schedule_order_due(&self, order: &Order) {
        self.orders.borrow_mut().push((order.id, order.due_date));
    }

    fn schedule_task_due(&self, task: &Task) {
        self.tasks.borrow_mut().push((task.id, task.due_date));
    }
}

fn company(terms: PaymentTerms) -> Company {
    Company::new(
        "Acme",
        BusinessType::Brand,
        terms,
        Country::UnitedStates,
        PipelineStatus::ActiveClient,
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn due_date_is_fixed_from_company_terms_at_add_time() {
    let collections = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let scheduler = RecordingScheduler::default();
    let mut repo = CrmRepository::open(&collections, &blobs, &scheduler);

    let acme = company(PaymentTerms::Days30);
    let acme_id = acme.id;
    repo.add_company(acme);

    let order = Order::new(date(2024, 1, 1), Decimal::from(100), Currency::Usd, "INV-1");
    let order_id = order.id;
    repo.add_order(order, acme_id).unwrap();
    assert_eq!(repo.order(order_id).unwrap().due_date, date(2024, 1, 31));

    // Changing the company's terms later must not rewrite existing orders.
    let mut edited = repo.company(acme_id).unwrap().clone();
    edited.payment_terms = PaymentTerms::Days90;
    repo.update_company(edited).unwrap();
    assert_eq!(repo.order(order_id).unwrap().due_date, date(2024, 1, 31));

    // But new orders pick up the new terms.
    let later = Order::new(date(2024, 2, 1), Decimal::from(50), Currency::Usd, "INV-2");
    let later_id = later.id;
    repo.add_order(later, acme_id).unwrap();
    assert_eq!(repo.order(later_id).unwrap().due_date, date(2024, 5, 1));
}

#[test]
fn pre_pay_orders_are_due_on_the_issued_date() {
    let collections = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let scheduler = RecordingScheduler::default();
    let mut repo = CrmRepository::open(&collections, &blobs, &scheduler);

    let acme = company(PaymentTerms::PrePay);
    let acme_id = acme.id;
    repo.add_company(acme);

    let order = Order::new(date(2024, 6, 5), Decimal::from(10), Currency::Gbp, "INV-3");
    let order_id = order.id;
    repo.add_order(order, acme_id).unwrap();
    assert_eq!(repo.order(order_id).unwrap().due_date, date(2024, 6, 5));
}

#[test]
fn add_and_update_request_due_date_notifications() {
    let collections = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let scheduler = RecordingScheduler::default();
    let mut repo = CrmRepository::open(&collections, &blobs, &scheduler);

    let acme = company(PaymentTerms::Days15);
    let acme_id = acme.id;
    repo.add_company(acme);

    let order = Order::new(date(2024, 1, 1), Decimal::from(100), Currency::Eur, "INV-4");
    let order_id = order.id;
    repo.add_order(order, acme_id).unwrap();

    let mut paid = repo.order(order_id).unwrap().clone();
    paid.is_fully_paid = true;
    paid.paid_date = Some(date(2024, 1, 10));
    repo.update_order(paid).unwrap();

    let task = Task::new("Chase signature", "", date(2024, 1, 20));
    let task_id = task.id;
    repo.add_task(task, acme_id).unwrap();

    let order_requests = scheduler.orders.borrow();
    assert_eq!(order_requests.len(), 2);
    assert!(order_requests
        .iter()
        .all(|(id, due)| *id == order_id && *due == date(2024, 1, 16)));

    let task_requests = scheduler.tasks.borrow();
    assert_eq!(task_requests.as_slice(), &[(task_id, date(2024, 1, 20))]);
}

#[test]
fn negative_amounts_are_rejected_before_any_mutation() {
    let collections = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let scheduler = RecordingScheduler::default();
    let mut repo = CrmRepository::open(&collections, &blobs, &scheduler);

    let acme = company(PaymentTerms::Days30);
    let acme_id = acme.id;
    repo.add_company(acme);

    let order = Order::new(date(2024, 1, 1), Decimal::from(-5), Currency::Usd, "BAD");
    let order_id = order.id;
    let err = repo.add_order(order, acme_id).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert!(repo.order(order_id).is_none());
    assert!(repo.company(acme_id).unwrap().order_ids.is_empty());
    assert!(scheduler.orders.borrow().is_empty());
}

#[test]
fn lenient_mode_ignores_unknown_company_without_mutating() {
    let collections = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let scheduler = RecordingScheduler::default();
    let mut repo = CrmRepository::open(&collections, &blobs, &scheduler);

    let order = Order::new(date(2024, 1, 1), Decimal::from(5), Currency::Usd, "INV-5");
    let order_id = order.id;
    let ghost_company = uuid::Uuid::new_v4();

    repo.add_order(order, ghost_company).unwrap();

    assert!(repo.order(order_id).is_none());
    assert!(scheduler.orders.borrow().is_empty());
}

#[test]
fn strict_mode_surfaces_unknown_company_as_typed_error() {
    let collections = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let scheduler = RecordingScheduler::default();
    let mut repo =
        CrmRepository::open_with_mode(&collections, &blobs, &scheduler, ReferentialMode::Strict);

    let ghost_company = uuid::Uuid::new_v4();
    let order = Order::new(date(2024, 1, 1), Decimal::from(5), Currency::Usd, "INV-6");

    let err = repo.add_order(order, ghost_company).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id, .. } if id == ghost_company));
}
