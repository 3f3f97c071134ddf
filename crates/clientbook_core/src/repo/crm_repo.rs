//! CRM repository over swappable persistence backends.
//!
//! # Responsibility
//! - Load the six collections at startup, tolerating missing or corrupt
//!   snapshots (each falls back to empty, logged).
//! - Provide the full CRUD + relationship-query surface consumed by
//!   presentation layers.
//! - Cascade company deletion across contacts, orders, interactions and
//!   tasks, including captured-photo blobs.
//!
//! # Invariants
//! - After every public mutation, parent child-ID lists and child
//!   back-references agree (an ID appears in a list iff the child exists
//!   and points back at that company).
//! - Every mutation is followed by a full-state persist; write failures
//!   are logged and the in-memory state stays authoritative.
//! - Referential misses are log-and-skip by default (`Lenient`) and
//!   typed errors under `Strict`; no partial mutation is applied either way.

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::activity::{Interaction, Note, Task};
use crate::model::company::Company;
use crate::model::contact::{default_avatar_bytes, pick_default_avatar, Contact};
use crate::model::order::{due_date_for, Order, OrderValidationError};
use crate::model::{CompanyOwned, EntityId};
use crate::notify::NotificationScheduler;
use crate::store::{collections, BlobStore, CollectionStore};

/// Sentinel returned when an owning company cannot be resolved.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity collections managed by the repository.
///
/// Doubles as the change-notification payload so observers can re-render
/// selectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    Contact,
    Order,
    Interaction,
    Task,
    Note,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Company => "company",
            Self::Contact => "contact",
            Self::Order => "order",
            Self::Interaction => "interaction",
            Self::Task => "task",
            Self::Note => "note",
        };
        f.write_str(name)
    }
}

/// Repository error for mutation operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(OrderValidationError),
    /// Raised only under `ReferentialMode::Strict`.
    NotFound { kind: EntityKind, id: EntityId },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<OrderValidationError> for RepoError {
    fn from(value: OrderValidationError) -> Self {
        Self::Validation(value)
    }
}

/// How the repository treats operations referencing unknown IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialMode {
    /// Log the miss and apply nothing; the call still succeeds. This is
    /// the offline-tolerant behavior presentation layers rely on.
    #[default]
    Lenient,
    /// Return `RepoError::NotFound` instead of ignoring the miss.
    Strict,
}

/// The in-memory source of truth for all CRM entities.
///
/// Companies live in an ordered list (they are the top-level browsing
/// collection); children live in ID-keyed maps (they are looked up by ID
/// far more often than enumerated).
pub struct CrmRepository<S, B, N> {
    companies: Vec<Company>,
    contacts: HashMap<EntityId, Contact>,
    orders: HashMap<EntityId, Order>,
    interactions: HashMap<EntityId, Interaction>,
    tasks: HashMap<EntityId, Task>,
    notes: HashMap<EntityId, Note>,
    collection_store: S,
    blob_store: B,
    scheduler: N,
    mode: ReferentialMode,
    observers: Vec<Box<dyn Fn(EntityKind)>>,
}

impl<S, B, N> CrmRepository<S, B, N>
where
    S: CollectionStore,
    B: BlobStore,
    N: NotificationScheduler,
{
    /// Loads all collections from the backend with lenient referential
    /// handling. Missing or corrupt snapshots yield empty collections;
    /// opening never fails.
    pub fn open(collection_store: S, blob_store: B, scheduler: N) -> Self {
        Self::open_with_mode(collection_store, blob_store, scheduler, ReferentialMode::default())
    }

    /// Same as `open`, with an explicit referential-miss policy.
    pub fn open_with_mode(
        collection_store: S,
        blob_store: B,
        scheduler: N,
        mode: ReferentialMode,
    ) -> Self {
        let companies: Vec<Company> = load_collection(&collection_store, collections::COMPANIES);
        let contacts = index_by_id(load_collection::<Contact, _>(
            &collection_store,
            collections::CONTACTS,
        ), |record| record.id);
        let orders = index_by_id(load_collection::<Order, _>(
            &collection_store,
            collections::ORDERS,
        ), |record| record.id);
        let interactions = index_by_id(load_collection::<Interaction, _>(
            &collection_store,
            collections::INTERACTIONS,
        ), |record| record.id);
        let tasks = index_by_id(load_collection::<Task, _>(
            &collection_store,
            collections::TASKS,
        ), |record| record.id);
        let notes = index_by_id(load_collection::<Note, _>(
            &collection_store,
            collections::NOTES,
        ), |record| record.id);

        info!(
            "event=repo_open module=repo status=ok companies={} contacts={} orders={} interactions={} tasks={} notes={}",
            companies.len(),
            contacts.len(),
            orders.len(),
            interactions.len(),
            tasks.len(),
            notes.len()
        );

        Self {
            companies,
            contacts,
            orders,
            interactions,
            tasks,
            notes,
            collection_store,
            blob_store,
            scheduler,
            mode,
            observers: Vec::new(),
        }
    }

    /// Registers an observer called after every successful mutation with
    /// the kind of collection that changed.
    pub fn subscribe(&mut self, observer: impl Fn(EntityKind) + 'static) {
        self.observers.push(Box::new(observer));
    }

    // --- companies ---------------------------------------------------

    pub fn add_company(&mut self, company: Company) {
        self.companies.push(company);
        self.persist_all();
        self.notify(EntityKind::Company);
    }

    /// Full-record replacement keyed by ID.
    pub fn update_company(&mut self, company: Company) -> RepoResult<()> {
        let Some(index) = self.company_index(company.id) else {
            return self.referential_miss("update_company", EntityKind::Company, company.id);
        };
        self.companies[index] = company;
        self.persist_all();
        self.notify(EntityKind::Company);
        Ok(())
    }

    /// Deletes a company and every child it references, including
    /// captured photo blobs of its contacts.
    pub fn delete_company(&mut self, company_id: EntityId) -> RepoResult<()> {
        let Some(index) = self.company_index(company_id) else {
            return self.referential_miss("delete_company", EntityKind::Company, company_id);
        };
        let company = self.companies.remove(index);

        for contact_id in &company.contact_ids {
            if let Some(contact) = self.contacts.remove(contact_id) {
                self.delete_captured_photo(&contact);
            }
        }
        for order_id in &company.order_ids {
            self.orders.remove(order_id);
        }
        for interaction_id in &company.interaction_ids {
            self.interactions.remove(interaction_id);
        }
        for task_id in &company.task_ids {
            self.tasks.remove(task_id);
        }

        info!(
            "event=company_deleted module=repo id={} contacts={} orders={} interactions={} tasks={}",
            company.id,
            company.contact_ids.len(),
            company.order_ids.len(),
            company.interaction_ids.len(),
            company.task_ids.len()
        );

        self.persist_all();
        self.notify(EntityKind::Company);
        if !company.contact_ids.is_empty() {
            self.notify(EntityKind::Contact);
        }
        if !company.order_ids.is_empty() {
            self.notify(EntityKind::Order);
        }
        if !company.interaction_ids.is_empty() {
            self.notify(EntityKind::Interaction);
        }
        if !company.task_ids.is_empty() {
            self.notify(EntityKind::Task);
        }
        Ok(())
    }

    // --- contacts ----------------------------------------------------

    /// Adds a contact to a company.
    ///
    /// With an image, the blob is stored under the contact-derived
    /// filename and referenced; without one, an empty photo reference is
    /// replaced by a pseudo-randomly picked default avatar, so the
    /// reference is never empty after creation.
    pub fn add_contact(
        &mut self,
        mut contact: Contact,
        image: Option<&[u8]>,
        company_id: EntityId,
    ) -> RepoResult<()> {
        let Some(index) = self.company_index(company_id) else {
            return self.referential_miss("add_contact", EntityKind::Company, company_id);
        };

        if let Some(bytes) = image {
            contact.photo_name = self.store_photo(&contact, bytes);
        } else if contact.photo_name.is_empty() {
            contact.photo_name = pick_default_avatar().to_string();
        }
        contact.company_id = Some(company_id);

        let contact_id = contact.id;
        self.contacts.insert(contact_id, contact);
        self.companies[index].contact_ids.push(contact_id);

        self.persist_all();
        self.notify(EntityKind::Contact);
        self.notify(EntityKind::Company);
        Ok(())
    }

    /// Replaces a contact record; a supplied image overwrites the stored
    /// blob under the existing contact-derived filename.
    pub fn update_contact(&mut self, mut contact: Contact, image: Option<&[u8]>) -> RepoResult<()> {
        if !self.contacts.contains_key(&contact.id) {
            return self.referential_miss("update_contact", EntityKind::Contact, contact.id);
        }

        if let Some(bytes) = image {
            contact.photo_name = self.store_photo(&contact, bytes);
        }
        self.contacts.insert(contact.id, contact);

        self.persist_all();
        self.notify(EntityKind::Contact);
        Ok(())
    }

    /// Removes a contact, strips its ID from every company's contact
    /// list and best-effort deletes its captured photo blob.
    pub fn delete_contact(&mut self, contact_id: EntityId) -> RepoResult<()> {
        let Some(contact) = self.contacts.remove(&contact_id) else {
            return self.referential_miss("delete_contact", EntityKind::Contact, contact_id);
        };
        for company in &mut self.companies {
            company.contact_ids.retain(|id| *id != contact_id);
        }
        self.delete_captured_photo(&contact);

        self.persist_all();
        self.notify(EntityKind::Contact);
        self.notify(EntityKind::Company);
        Ok(())
    }

    /// Resolves a contact's photo reference to image bytes: stored blob
    /// first, bundled default avatar second, `None` if neither resolves.
    pub fn image_for_contact(&self, contact_id: EntityId) -> Option<Vec<u8>> {
        let contact = self.contacts.get(&contact_id)?;
        match self.blob_store.load_blob(&contact.photo_name) {
            Ok(Some(bytes)) => return Some(bytes),
            Ok(None) => {}
            Err(err) => warn!(
                "event=blob_load module=repo name={} status=error error={err}",
                contact.photo_name
            ),
        }
        default_avatar_bytes(&contact.photo_name).map(<[u8]>::to_vec)
    }

    // --- orders ------------------------------------------------------

    /// Adds an order to a company. The due date is derived here, once,
    /// from the owning company's payment terms; later changes to the
    /// company's terms do not touch existing orders. Requests a due-date
    /// notification from the scheduler.
    pub fn add_order(&mut self, mut order: Order, company_id: EntityId) -> RepoResult<()> {
        order.validate()?;
        let Some(index) = self.company_index(company_id) else {
            return self.referential_miss("add_order", EntityKind::Company, company_id);
        };

        order.due_date = due_date_for(order.issued_date, self.companies[index].payment_terms);
        order.company_id = Some(company_id);
        self.scheduler.schedule_order_due(&order);

        let order_id = order.id;
        self.orders.insert(order_id, order);
        self.companies[index].order_ids.push(order_id);

        self.persist_all();
        self.notify(EntityKind::Order);
        self.notify(EntityKind::Company);
        Ok(())
    }

    /// Full-record replacement; re-requests the due-date notification so
    /// edits keep pending notifications current.
    pub fn update_order(&mut self, order: Order) -> RepoResult<()> {
        order.validate()?;
        if !self.orders.contains_key(&order.id) {
            return self.referential_miss("update_order", EntityKind::Order, order.id);
        }
        self.scheduler.schedule_order_due(&order);
        self.orders.insert(order.id, order);

        self.persist_all();
        self.notify(EntityKind::Order);
        Ok(())
    }

    pub fn delete_order(&mut self, order_id: EntityId) -> RepoResult<()> {
        if self.orders.remove(&order_id).is_none() {
            return self.referential_miss("delete_order", EntityKind::Order, order_id);
        }
        for company in &mut self.companies {
            company.order_ids.retain(|id| *id != order_id);
        }

        self.persist_all();
        self.notify(EntityKind::Order);
        self.notify(EntityKind::Company);
        Ok(())
    }

    // --- interactions ------------------------------------------------

    pub fn add_interaction(
        &mut self,
        mut interaction: Interaction,
        company_id: EntityId,
    ) -> RepoResult<()> {
        let Some(index) = self.company_index(company_id) else {
            return self.referential_miss("add_interaction", EntityKind::Company, company_id);
        };
        interaction.company_id = Some(company_id);

        let interaction_id = interaction.id;
        self.interactions.insert(interaction_id, interaction);
        self.companies[index].interaction_ids.push(interaction_id);

        self.persist_all();
        self.notify(EntityKind::Interaction);
        self.notify(EntityKind::Company);
        Ok(())
    }

    pub fn update_interaction(&mut self, interaction: Interaction) -> RepoResult<()> {
        if !self.interactions.contains_key(&interaction.id) {
            return self.referential_miss(
                "update_interaction",
                EntityKind::Interaction,
                interaction.id,
            );
        }
        self.interactions.insert(interaction.id, interaction);

        self.persist_all();
        self.notify(EntityKind::Interaction);
        Ok(())
    }

    pub fn delete_interaction(&mut self, interaction_id: EntityId) -> RepoResult<()> {
        if self.interactions.remove(&interaction_id).is_none() {
            return self.referential_miss(
                "delete_interaction",
                EntityKind::Interaction,
                interaction_id,
            );
        }
        for company in &mut self.companies {
            company.interaction_ids.retain(|id| *id != interaction_id);
        }

        self.persist_all();
        self.notify(EntityKind::Interaction);
        self.notify(EntityKind::Company);
        Ok(())
    }

    // --- tasks -------------------------------------------------------

    /// Adds a task to a company and requests a due-date notification.
    pub fn add_task(&mut self, mut task: Task, company_id: EntityId) -> RepoResult<()> {
        let Some(index) = self.company_index(company_id) else {
            return self.referential_miss("add_task", EntityKind::Company, company_id);
        };
        task.company_id = Some(company_id);
        self.scheduler.schedule_task_due(&task);

        let task_id = task.id;
        self.tasks.insert(task_id, task);
        self.companies[index].task_ids.push(task_id);

        self.persist_all();
        self.notify(EntityKind::Task);
        self.notify(EntityKind::Company);
        Ok(())
    }

    /// Full-record replacement; re-requests the due-date notification.
    pub fn update_task(&mut self, task: Task) -> RepoResult<()> {
        if !self.tasks.contains_key(&task.id) {
            return self.referential_miss("update_task", EntityKind::Task, task.id);
        }
        self.scheduler.schedule_task_due(&task);
        self.tasks.insert(task.id, task);

        self.persist_all();
        self.notify(EntityKind::Task);
        Ok(())
    }

    pub fn delete_task(&mut self, task_id: EntityId) -> RepoResult<()> {
        if self.tasks.remove(&task_id).is_none() {
            return self.referential_miss("delete_task", EntityKind::Task, task_id);
        }
        for company in &mut self.companies {
            company.task_ids.retain(|id| *id != task_id);
        }

        self.persist_all();
        self.notify(EntityKind::Task);
        self.notify(EntityKind::Company);
        Ok(())
    }

    // --- notes -------------------------------------------------------

    /// Notes are reached only through their contact back-reference and
    /// never appear in company child-ID lists.
    pub fn add_note(&mut self, note: Note) {
        self.notes.insert(note.id, note);
        self.persist_all();
        self.notify(EntityKind::Note);
    }

    pub fn update_note(&mut self, note: Note) -> RepoResult<()> {
        if !self.notes.contains_key(&note.id) {
            return self.referential_miss("update_note", EntityKind::Note, note.id);
        }
        self.notes.insert(note.id, note);

        self.persist_all();
        self.notify(EntityKind::Note);
        Ok(())
    }

    pub fn delete_note(&mut self, note_id: EntityId) -> RepoResult<()> {
        if self.notes.remove(&note_id).is_none() {
            return self.referential_miss("delete_note", EntityKind::Note, note_id);
        }

        self.persist_all();
        self.notify(EntityKind::Note);
        Ok(())
    }

    // --- queries -----------------------------------------------------

    /// Companies in browsing order.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn company(&self, company_id: EntityId) -> Option<&Company> {
        self.companies.iter().find(|company| company.id == company_id)
    }

    pub fn contact(&self, contact_id: EntityId) -> Option<&Contact> {
        self.contacts.get(&contact_id)
    }

    pub fn order(&self, order_id: EntityId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn interaction(&self, interaction_id: EntityId) -> Option<&Interaction> {
        self.interactions.get(&interaction_id)
    }

    pub fn task(&self, task_id: EntityId) -> Option<&Task> {
        self.tasks.get(&task_id)
    }

    pub fn note(&self, note_id: EntityId) -> Option<&Note> {
        self.notes.get(&note_id)
    }

    /// Unordered views over whole collections, for reporting functions.
    pub fn all_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn all_contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn all_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.interactions.values()
    }

    pub fn all_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    /// Resolves a company's contact-ID list, silently dropping IDs that
    /// no longer resolve. Unknown companies yield an empty list.
    pub fn contacts_for_company(&self, company_id: EntityId) -> Vec<Contact> {
        self.resolve_children(company_id, |company| &company.contact_ids, &self.contacts)
    }

    pub fn orders_for_company(&self, company_id: EntityId) -> Vec<Order> {
        self.resolve_children(company_id, |company| &company.order_ids, &self.orders)
    }

    pub fn interactions_for_company(&self, company_id: EntityId) -> Vec<Interaction> {
        self.resolve_children(company_id, |company| &company.interaction_ids, &self.interactions)
    }

    pub fn tasks_for_company(&self, company_id: EntityId) -> Vec<Task> {
        self.resolve_children(company_id, |company| &company.task_ids, &self.tasks)
    }

    /// All notes attached to a contact, newest first.
    pub fn notes_for_contact(&self, contact_id: EntityId) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .values()
            .filter(|note| note.contact_id == contact_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.date.cmp(&a.date));
        notes
    }

    /// Name of the child's owning company, or the `UNKNOWN_COMPANY`
    /// sentinel when the back-reference is unset or dangling.
    pub fn company_name_for(&self, child: &impl CompanyOwned) -> String {
        child
            .company_id()
            .and_then(|company_id| self.company(company_id))
            .map(|company| company.name.clone())
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
    }

    // --- internals ---------------------------------------------------

    fn company_index(&self, company_id: EntityId) -> Option<usize> {
        self.companies
            .iter()
            .position(|company| company.id == company_id)
    }

    fn resolve_children<T: Clone>(
        &self,
        company_id: EntityId,
        child_ids: impl Fn(&Company) -> &[EntityId],
        map: &HashMap<EntityId, T>,
    ) -> Vec<T> {
        let Some(company) = self.company(company_id) else {
            return Vec::new();
        };
        child_ids(company)
            .iter()
            .filter_map(|id| map.get(id).cloned())
            .collect()
    }

    fn referential_miss(
        &self,
        op: &'static str,
        kind: EntityKind,
        id: EntityId,
    ) -> RepoResult<()> {
        match self.mode {
            ReferentialMode::Lenient => {
                warn!("event=referential_miss module=repo op={op} kind={kind} id={id} status=ignored");
                Ok(())
            }
            ReferentialMode::Strict => Err(RepoError::NotFound { kind, id }),
        }
    }

    fn store_photo(&self, contact: &Contact, bytes: &[u8]) -> String {
        let filename = contact.stored_photo_filename();
        if let Err(err) = self.blob_store.save_blob(&filename, bytes) {
            // Log-only per write-failure policy; the reference may dangle
            // until the next successful save.
            warn!("event=blob_save module=repo name={filename} status=error error={err}");
        }
        filename
    }

    fn delete_captured_photo(&self, contact: &Contact) {
        if !contact.has_captured_photo() {
            return;
        }
        if let Err(err) = self.blob_store.delete_blob(&contact.photo_name) {
            warn!(
                "event=blob_delete module=repo name={} status=error error={err}",
                contact.photo_name
            );
        }
    }

    /// Writes the complete snapshot of all six collections. Failures are
    /// logged per collection; in-memory state is never rolled back.
    fn persist_all(&self) {
        self.persist_payload(collections::COMPANIES, &self.companies);
        self.persist_map(collections::CONTACTS, &self.contacts);
        self.persist_map(collections::ORDERS, &self.orders);
        self.persist_map(collections::INTERACTIONS, &self.interactions);
        self.persist_map(collections::TASKS, &self.tasks);
        self.persist_map(collections::NOTES, &self.notes);
    }

    fn persist_map<T: Serialize>(&self, name: &str, map: &HashMap<EntityId, T>) {
        // Serialize in ID order so identical state yields identical
        // snapshot bytes regardless of map iteration order.
        let mut ids: Vec<&EntityId> = map.keys().collect();
        ids.sort_unstable();
        let records: Vec<&T> = ids.into_iter().map(|id| &map[id]).collect();
        self.persist_payload(name, &records);
    }

    fn persist_payload<T: Serialize + ?Sized>(&self, name: &str, records: &T) {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=persist module=repo collection={name} status=serialize_error error={err}");
                return;
            }
        };
        if let Err(err) = self.collection_store.save(name, &payload) {
            warn!("event=persist module=repo collection={name} status=error error={err}");
        }
    }

    fn notify(&self, kind: EntityKind) {
        for observer in &self.observers {
            observer(kind);
        }
    }
}

fn load_collection<T: DeserializeOwned, S: CollectionStore>(store: &S, name: &str) -> Vec<T> {
    match store.load(name) {
        Ok(Some(payload)) => match serde_json::from_str(&payload) {
            Ok(records) => records,
            Err(err) => {
                warn!("event=collection_load module=repo collection={name} status=corrupt error={err}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("event=collection_load module=repo collection={name} status=error error={err}");
            Vec::new()
        }
    }
}

fn index_by_id<T>(records: Vec<T>, id_of: impl Fn(&T) -> EntityId) -> HashMap<EntityId, T> {
    records
        .into_iter()
        .map(|record| (id_of(&record), record))
        .collect()
}
