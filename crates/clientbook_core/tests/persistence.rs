use chrono::NaiveDate;
use clientbook_core::db::open_db;
use clientbook_core::store::collections;
use clientbook_core::{
    BusinessType, Company, Contact, Country, CrmRepository, Currency, LogOnlyScheduler,
    MemoryBlobStore, MemoryCollectionStore, Order, PaymentTerms, PipelineStatus,
    SqliteCollectionStore,
};
use rust_decimal::Decimal;

fn company(name: &str) -> Company {
    Company::new(
        name,
        BusinessType::Reseller,
        PaymentTerms::Days30,
        Country::Italy,
        PipelineStatus::ActiveClient,
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn state_survives_reopen_through_the_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("clientbook.db");

    let acme = company("Acme");
    let acme_id = acme.id;
    let contact = Contact::new("Jane", "Doe");
    let contact_id = contact.id;
    let order = Order::new(date(2024, 1, 1), Decimal::from(100), Currency::Usd, "INV-1");
    let order_id = order.id;

    {
        let store = SqliteCollectionStore::try_new(open_db(&db_path).unwrap()).unwrap();
        let mut repo = CrmRepository::open(store, MemoryBlobStore::new(), LogOnlyScheduler);
        repo.add_company(acme);
        repo.add_contact(contact, None, acme_id).unwrap();
        repo.add_order(order, acme_id).unwrap();
    }

    let store = SqliteCollectionStore::try_new(open_db(&db_path).unwrap()).unwrap();
    let repo = CrmRepository::open(store, MemoryBlobStore::new(), LogOnlyScheduler);

    let reloaded = repo.company(acme_id).expect("company should survive reopen");
    assert_eq!(reloaded.name, "Acme");
    assert_eq!(reloaded.contact_ids, vec![contact_id]);
    assert_eq!(reloaded.order_ids, vec![order_id]);

    assert_eq!(repo.contact(contact_id).unwrap().company_id, Some(acme_id));
    let reloaded_order = repo.order(order_id).unwrap();
    assert_eq!(reloaded_order.due_date, date(2024, 1, 31));
    assert_eq!(reloaded_order.amount, Decimal::from(100));
    assert_eq!(reloaded_order.currency, Currency::Usd);
}

#[test]
fn corrupt_snapshot_empties_only_that_collection() {
    let store = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();

    // Build valid state, then corrupt one snapshot in place.
    let acme = company("Acme");
    let acme_id = acme.id;
    {
        let mut repo = CrmRepository::open(&store, &blobs, LogOnlyScheduler);
        repo.add_company(acme);
        let order = Order::new(date(2024, 1, 1), Decimal::from(10), Currency::Eur, "INV-1");
        repo.add_order(order, acme_id).unwrap();
    }
    store.seed(collections::ORDERS, "{not json");

    let repo = CrmRepository::open(&store, &blobs, LogOnlyScheduler);
    assert_eq!(repo.all_orders().count(), 0);
    // The company collection still loaded, dangling order reference and all.
    assert_eq!(repo.companies().len(), 1);
    assert_eq!(repo.company(acme_id).unwrap().order_ids.len(), 1);
    // Queries tolerate the dangling reference.
    assert!(repo.orders_for_company(acme_id).is_empty());
}

#[test]
fn missing_snapshots_open_as_empty_collections() {
    let store = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let repo = CrmRepository::open(&store, &blobs, LogOnlyScheduler);

    assert!(repo.companies().is_empty());
    assert_eq!(repo.all_contacts().count(), 0);
    assert_eq!(repo.all_orders().count(), 0);
    assert_eq!(repo.all_interactions().count(), 0);
    assert_eq!(repo.all_tasks().count(), 0);
    assert_eq!(repo.all_notes().count(), 0);
}

#[test]
fn write_failure_is_tolerated_and_memory_stays_authoritative() {
    let store = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let mut repo = CrmRepository::open(&store, &blobs, LogOnlyScheduler);

    let acme = company("Acme");
    let acme_id = acme.id;
    repo.add_company(acme);
    let persisted_before = store.snapshot(collections::COMPANIES).unwrap();

    store.set_fail_writes(true);
    let ghosted = company("Ghosted Writes Ltd");
    let ghosted_id = ghosted.id;
    repo.add_company(ghosted);

    // In-memory state moved on even though the snapshot write failed.
    assert!(repo.company(ghosted_id).is_some());
    assert_eq!(store.snapshot(collections::COMPANIES).unwrap(), persisted_before);

    // The next successful persist catches the store up.
    store.set_fail_writes(false);
    let mut edited = repo.company(acme_id).unwrap().clone();
    edited.notes = "touched".to_string();
    repo.update_company(edited).unwrap();

    let caught_up = store.snapshot(collections::COMPANIES).unwrap();
    assert!(caught_up.contains("Ghosted Writes Ltd"));
}

#[test]
fn unmodified_update_produces_identical_snapshots() {
    let store = MemoryCollectionStore::new();
    let blobs = MemoryBlobStore::new();
    let mut repo = CrmRepository::open(&store, &blobs, LogOnlyScheduler);

    let acme = company("Acme");
    let acme_id = acme.id;
    repo.add_company(acme);
    for n in 0..3 {
        let contact = Contact::new(format!("C{n}"), "Person");
        repo.add_contact(contact, None, acme_id).unwrap();
        let order = Order::new(
            date(2024, 1, 1 + n),
            Decimal::from(10),
            Currency::Eur,
            format!("INV-{n}"),
        );
        repo.add_order(order, acme_id).unwrap();
    }

    let all = [
        collections::COMPANIES,
        collections::CONTACTS,
        collections::ORDERS,
        collections::INTERACTIONS,
        collections::TASKS,
        collections::NOTES,
    ];
    let before: Vec<String> = all
        .iter()
        .map(|name| store.snapshot(name).unwrap())
        .collect();

    let unchanged = repo.company(acme_id).unwrap().clone();
    repo.update_company(unchanged).unwrap();

    let after: Vec<String> = all
        .iter()
        .map(|name| store.snapshot(name).unwrap())
        .collect();
    assert_eq!(before, after);
}
