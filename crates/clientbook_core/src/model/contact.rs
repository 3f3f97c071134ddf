//! Contact domain model and default-avatar table.
//!
//! # Responsibility
//! - Define the person record attached to a company.
//! - Resolve photo references: either a blob filename derived from the
//!   contact ID, or one of the bundled default-avatar identifiers.
//!
//! # Invariants
//! - `photo_name` is never empty after the contact has been added to the
//!   repository; creation without an image falls back to a default avatar.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{CompanyOwned, EntityId};

/// Symbolic identifiers of the bundled placeholder avatars.
pub const DEFAULT_AVATARS: &[&str] = &[
    "avatar-sky",
    "avatar-moss",
    "avatar-clay",
    "avatar-sand",
    "avatar-slate",
    "avatar-plum",
];

/// Bundled placeholder images, keyed by symbolic avatar identifier.
pub fn default_avatar_bytes(name: &str) -> Option<&'static [u8]> {
    match name {
        "avatar-sky" => Some(include_bytes!("../../assets/avatars/avatar-sky.png")),
        "avatar-moss" => Some(include_bytes!("../../assets/avatars/avatar-moss.png")),
        "avatar-clay" => Some(include_bytes!("../../assets/avatars/avatar-clay.png")),
        "avatar-sand" => Some(include_bytes!("../../assets/avatars/avatar-sand.png")),
        "avatar-slate" => Some(include_bytes!("../../assets/avatars/avatar-slate.png")),
        "avatar-plum" => Some(include_bytes!("../../assets/avatars/avatar-plum.png")),
        _ => None,
    }
}

/// Picks one of the default avatar identifiers pseudo-randomly.
pub fn pick_default_avatar() -> &'static str {
    let index = rand::thread_rng().gen_range(0..DEFAULT_AVATARS.len());
    DEFAULT_AVATARS[index]
}

/// A person working at (or associated with) a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    /// Blob filename (`"{id}.jpg"`) or a `DEFAULT_AVATARS` identifier.
    pub photo_name: String,
    pub company_id: Option<EntityId>,
}

impl Contact {
    /// Creates a contact with a generated stable ID and no photo reference.
    ///
    /// The repository assigns `photo_name` when the contact is added.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            job_title: String::new(),
            email: String::new(),
            phone: String::new(),
            photo_name: String::new(),
            company_id: None,
        }
    }

    /// Filename under which a captured photo for this contact is stored.
    pub fn stored_photo_filename(&self) -> String {
        format!("{}.jpg", self.id)
    }

    /// Whether `photo_name` points at a stored blob rather than a
    /// bundled default avatar.
    pub fn has_captured_photo(&self) -> bool {
        !self.photo_name.is_empty() && !DEFAULT_AVATARS.contains(&self.photo_name.as_str())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl CompanyOwned for Contact {
    fn company_id(&self) -> Option<EntityId> {
        self.company_id
    }
}

#[cfg(test)]
mod tests {
    use super::{default_avatar_bytes, pick_default_avatar, Contact, DEFAULT_AVATARS};

    #[test]
    fn picked_avatar_is_always_from_the_fixed_set() {
        for _ in 0..50 {
            assert!(DEFAULT_AVATARS.contains(&pick_default_avatar()));
        }
    }

    #[test]
    fn every_default_avatar_has_bundled_bytes() {
        for name in DEFAULT_AVATARS {
            let bytes = default_avatar_bytes(name).expect("bundled avatar missing");
            assert!(!bytes.is_empty());
        }
        assert!(default_avatar_bytes("not-an-avatar").is_none());
    }

    #[test]
    fn captured_photo_detection_distinguishes_avatars_from_blobs() {
        let mut contact = Contact::new("Jane", "Doe");
        assert!(!contact.has_captured_photo());

        contact.photo_name = "avatar-sky".to_string();
        assert!(!contact.has_captured_photo());

        contact.photo_name = contact.stored_photo_filename();
        assert!(contact.has_captured_photo());
    }
}
