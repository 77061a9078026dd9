pub mod admin;
pub mod config;
pub mod contact;
pub mod frontend;
pub mod model;

// HTTP API (requires "http" feature)
#[cfg(feature = "http")]
pub mod api;

pub use config::{Config, ConfigError, StoreBackend};
pub use contact::{
    open_store, Contact, ContactError, ContactPatch, ContactPayload, ContactStore,
    ModelContactStore, NewContact, StoreOpenError,
};
pub use model::{FileModelStore, InMemoryModelStore, Model, ModelError, ModelStore, ModelsExt};

#[cfg(feature = "http")]
pub use api::{router, start_server, ApiError};
