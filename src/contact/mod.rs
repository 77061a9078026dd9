//! Contacts - the phonebook's one entity and everything that guards it.
//!
//! [`Contact`] is the wire shape (`{id, name, number}`); [`ContactRecord`] is
//! what the model store keeps. The two are kept apart so storage metadata
//! (the revision counter carried by [`Versioned`]) never reaches a client.

pub mod policy;
mod store;
mod validation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Model, ModelError, Versioned};

pub use store::{open_store, ContactStore, ModelContactStore, StoreOpenError};
pub use validation::{validate_new, validate_patch, ValidationError};

/// A phonebook entry as seen by API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub number: String,
}

/// Storage representation of a contact.
///
/// `name` is a unique field of the `persons` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub number: String,
}

impl Model for ContactRecord {
    const COLLECTION: &'static str = "persons";

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }
}

impl From<Versioned<ContactRecord>> for Contact {
    fn from(versioned: Versioned<ContactRecord>) -> Self {
        let ContactRecord { id, name, number } = versioned.data;
        Contact { id, name, number }
    }
}

/// Raw create/update body. Both fields are optional here so that missing
/// values are reported by validation rather than by the JSON decoder.
///
/// Unknown keys (including a client supplied `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

impl ContactPayload {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }
}

/// A validated contact about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub number: String,
}

/// A validated partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl ContactPatch {
    fn apply(self, record: &mut ContactRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(number) = self.number {
            record.number = number;
        }
    }
}

/// Failures of contact store operations.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("person not found: {0}")]
    NotFound(String),
    #[error("name must be unique: {0}")]
    Conflict(String),
    #[error("malformed id: {0}")]
    MalformedId(String),
    #[error(transparent)]
    Storage(ModelError),
}

impl From<ModelError> for ContactError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Duplicate { value, .. } => ContactError::Conflict(value),
            ModelError::NotFound { id, .. } => ContactError::NotFound(id),
            other => ContactError::Storage(other),
        }
    }
}
