//! InMemoryModelStore - HashMap-backed model store for testing and development.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::documents::Documents;
use super::{Model, ModelError, ModelStore, Versioned};

/// In-memory model store. Clone-friendly via Arc; clones share storage.
#[derive(Clone)]
pub struct InMemoryModelStore {
    storage: Arc<RwLock<Documents>>,
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryModelStore {
    /// Create a new empty model store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Documents::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>, ModelError> {
        self.storage
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents>, ModelError> {
        self.storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }
}

impl ModelStore for InMemoryModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        self.read()?.get(id)
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.write()?.insert(model)
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        self.write()?.update(model, expected_version)
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        Ok(self.write()?.delete::<M>(id))
    }

    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError> {
        self.read()?.find(predicate)
    }

    fn count_models<M: Model>(&self) -> Result<usize, ModelError> {
        Ok(self.read()?.count::<M>())
    }
}
