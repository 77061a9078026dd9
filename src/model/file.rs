//! FileModelStore - JSON document file backed model store.
//!
//! The whole document table lives in memory and is written back to a single
//! JSON file after every successful mutation. Writes go to a `.tmp` sibling
//! that is synced to disk and then renamed over the target, so a crash
//! mid-write leaves the previous file intact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use tracing::debug;

use super::documents::Documents;
use super::{Model, ModelError, ModelStore, Versioned};

/// Model store persisted to a JSON file. Clones share storage and file.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: Arc<PathBuf>,
    storage: Arc<RwLock<Documents>>,
}

impl FileModelStore {
    /// Open the store at `path`, creating an empty file if none exists.
    ///
    /// The parent directory must already exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let path = path.into();

        let documents = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Documents::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ModelError::Serde(format!("corrupt store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let documents = Documents::default();
                persist(&path, &documents)?;
                documents
            }
            Err(e) => {
                return Err(ModelError::Storage(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        debug!(path = %path.display(), "Opened file model store");

        Ok(Self {
            path: Arc::new(path),
            storage: Arc::new(RwLock::new(documents)),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>, ModelError> {
        self.storage
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }

    /// Apply `op` to a copy of the table, persist the copy, then publish it.
    /// Memory never runs ahead of the file.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Documents) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))?;

        let mut next = storage.clone();
        let result = op(&mut next)?;
        persist(&self.path, &next)?;
        *storage = next;

        Ok(result)
    }
}

fn persist(path: &Path, documents: &Documents) -> Result<(), ModelError> {
    let bytes = serde_json::to_vec_pretty(documents).map_err(|e| ModelError::Serde(e.to_string()))?;

    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    written.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ModelError::Storage(format!("cannot write {}: {}", path.display(), e))
    })
}

impl ModelStore for FileModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        self.read()?.get(id)
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.mutate(|documents| documents.insert(model))
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        self.mutate(|documents| documents.update(model, expected_version))
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        if self.read()?.get::<M>(id)?.is_none() {
            return Ok(false);
        }
        self.mutate(|documents| Ok(documents.delete::<M>(id)))
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
