//! Models - Storage-backed documents addressed by collection and id.
//!
//! A model store is the persistence layer of the phonebook. It keeps typed,
//! serde-serializable documents, tracks a revision counter per document and
//! enforces unique fields at write time, the way a document database would.
//!
//! ## Example
//!
//! ```ignore
//! use phonebook::model::{InMemoryModelStore, Model, ModelsExt};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Tag {
//!     pub id: String,
//!     pub label: String,
//! }
//!
//! impl Model for Tag {
//!     const COLLECTION: &'static str = "tags";
//!     fn id(&self) -> &str { &self.id }
//! }
//!
//! let store = InMemoryModelStore::new();
//! store.models::<Tag>().insert(&tag)?;
//! let loaded = store.models::<Tag>().get("tag-1")?;
//! ```

mod documents;
mod file;
mod in_memory;
mod model_repository;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "persons").
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;

    /// Field/value pairs that must be unique across the collection.
    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// A versioned wrapper around model data.
///
/// `version` is storage metadata: it starts at 1 on insert and grows by one
/// on every update.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// A unique field already holds this value in another document.
    #[error("duplicate key on {collection}.{field}: {value}")]
    Duplicate {
        collection: String,
        field: String,
        value: String,
    },
    /// Serialization/deserialization error.
    #[error("model serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("model storage error: {0}")]
    Storage(String),
    /// Model not found.
    #[error("model not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
}

pub use file::FileModelStore;
pub use in_memory::InMemoryModelStore;
pub use model_repository::{ModelRepository, ModelsExt};
pub use store::ModelStore;
