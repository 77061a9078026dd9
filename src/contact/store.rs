//! ContactStore - contact CRUD on top of any [`ModelStore`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Contact, ContactError, ContactPatch, ContactRecord, NewContact};
use crate::config::StoreBackend;
use crate::model::{
    FileModelStore, InMemoryModelStore, ModelError, ModelRepository, ModelStore, ModelsExt,
};

/// Persistence operations the API and the admin tool need.
///
/// Object safe, so a backend chosen at startup can be shared as
/// `Arc<dyn ContactStore>`.
pub trait ContactStore: Send + Sync {
    /// All contacts in creation order.
    fn list(&self) -> Result<Vec<Contact>, ContactError>;

    fn get_by_id(&self, id: &str) -> Result<Contact, ContactError>;

    /// Store a new contact under a freshly generated id.
    fn create(&self, contact: NewContact) -> Result<Contact, ContactError>;

    /// Apply `patch` to an existing contact. Unknown ids are `NotFound`,
    /// never an insert.
    fn update_by_id(&self, id: &str, patch: ContactPatch) -> Result<Contact, ContactError>;

    fn delete_by_id(&self, id: &str) -> Result<(), ContactError>;

    fn count(&self) -> Result<usize, ContactError>;
}

/// [`ContactStore`] backed by a model store.
///
/// Ids are UUID v4 strings; anything that does not parse as a UUID is a
/// `MalformedId`, which is reported before the store is consulted.
#[derive(Clone, Default)]
pub struct ModelContactStore<S> {
    store: S,
}

impl<S: ModelStore> ModelContactStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn records(&self) -> ModelRepository<'_, S, ContactRecord> {
        self.store.models::<ContactRecord>()
    }
}

fn canonical_id(id: &str) -> Result<String, ContactError> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| ContactError::MalformedId(id.to_string()))
}

impl<S: ModelStore> ContactStore for ModelContactStore<S> {
    fn list(&self) -> Result<Vec<Contact>, ContactError> {
        Ok(self.records().all()?.into_iter().map(Contact::from).collect())
    }

    fn get_by_id(&self, id: &str) -> Result<Contact, ContactError> {
        let id = canonical_id(id)?;
        self.records()
            .get(&id)?
            .map(Contact::from)
            .ok_or(ContactError::NotFound(id))
    }

    fn create(&self, contact: NewContact) -> Result<Contact, ContactError> {
        let record = ContactRecord {
            id: Uuid::new_v4().to_string(),
            name: contact.name,
            number: contact.number,
        };

        let saved = self.records().insert(&record)?;
        info!(id = %record.id, name = %record.name, number = %record.number, "Contact created");
        Ok(saved.into())
    }

    fn update_by_id(&self, id: &str, patch: ContactPatch) -> Result<Contact, ContactError> {
        let id = canonical_id(id)?;

        // one retry on a version race, then give up
        let mut attempts = 0;
        loop {
            attempts += 1;
            let current = self
                .records()
                .get(&id)?
                .ok_or_else(|| ContactError::NotFound(id.clone()))?;

            let mut record = current.data;
            patch.clone().apply(&mut record);

            match self.records().update(&record, current.version) {
                Ok(updated) => {
                    debug!(id = %id, version = updated.version, "Contact updated");
                    return Ok(updated.into());
                }
                Err(ModelError::ConcurrencyConflict { .. }) if attempts < 2 => continue,
                Err(ModelError::ConcurrencyConflict { .. }) => {
                    return Err(ContactError::Storage(ModelError::Storage(format!(
                        "contact {id} kept changing during update"
                    ))))
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn delete_by_id(&self, id: &str) -> Result<(), ContactError> {
        let id = canonical_id(id)?;
        if self.records().delete(&id)? {
            debug!(id = %id, "Contact deleted");
            Ok(())
        } else {
            Err(ContactError::NotFound(id))
        }
    }

    fn count(&self) -> Result<usize, ContactError> {
        Ok(self.records().count()?)
    }
}

/// The configured store could not be reached at startup.
#[derive(Debug, Error)]
#[error("cannot open contact store {backend}: {source}")]
pub struct StoreOpenError {
    pub backend: StoreBackend,
    #[source]
    pub source: ModelError,
}

/// Open the backend named by configuration.
pub fn open_store(backend: &StoreBackend) -> Result<Arc<dyn ContactStore>, StoreOpenError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(ModelContactStore::new(InMemoryModelStore::new()))),
        StoreBackend::File(path) => {
            let store = FileModelStore::open(path).map_err(|source| StoreOpenError {
                backend: backend.clone(),
                source,
            })?;
            Ok(Arc::new(ModelContactStore::new(store)))
        }
    }
}
