//! Documents - the keyed document table behind every model store backend.
//!
//! Storage key is `"COLLECTION:id"`. Each entry keeps the JSON document, its
//! revision, an insertion sequence number (so listings come back in the order
//! documents were created) and the unique field values it claims.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Model, ModelError, Versioned};

/// Internal stored representation of a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredModel {
    data: Value,
    version: u64,
    seq: u64,
    #[serde(default)]
    unique: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Documents {
    next_seq: u64,
    entries: HashMap<String, StoredModel>,
}

fn make_key(collection: &str, id: &str) -> String {
    format!("{}:{}", collection, id)
}

fn collection_prefix(collection: &str) -> String {
    format!("{}:", collection)
}

fn unique_values<M: Model>(model: &M) -> Vec<(String, String)> {
    model
        .unique_fields()
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}

fn encode<M: Model>(model: &M) -> Result<Value, ModelError> {
    serde_json::to_value(model).map_err(|e| ModelError::Serde(e.to_string()))
}

fn decode<M: Model>(stored: &StoredModel) -> Result<Versioned<M>, ModelError> {
    let data = serde_json::from_value(stored.data.clone())
        .map_err(|e| ModelError::Serde(e.to_string()))?;
    Ok(Versioned {
        data,
        version: stored.version,
    })
}

impl Documents {
    pub(crate) fn get<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        self.entries
            .get(&make_key(M::COLLECTION, id))
            .map(decode::<M>)
            .transpose()
    }

    pub(crate) fn insert<M: Model>(&mut self, model: &M) -> Result<Versioned<M>, ModelError> {
        let key = make_key(M::COLLECTION, model.id());
        let data = encode(model)?;

        if let Some(existing) = self.entries.get(&key) {
            return Err(ModelError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
                expected: 0,
                actual: existing.version,
            });
        }

        let unique = unique_values(model);
        self.check_unique::<M>(&key, &unique)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            StoredModel {
                data,
                version: 1,
                seq,
                unique,
            },
        );

        Ok(Versioned {
            data: model.clone(),
            version: 1,
        })
    }

    pub(crate) fn update<M: Model>(
        &mut self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        let key = make_key(M::COLLECTION, model.id());
        let data = encode(model)?;

        let (actual_version, seq) = self
            .entries
            .get(&key)
            .map(|s| (s.version, s.seq))
            .ok_or_else(|| ModelError::NotFound {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
            })?;

        if actual_version != expected_version {
            return Err(ModelError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
                expected: expected_version,
                actual: actual_version,
            });
        }

        let unique = unique_values(model);
        self.check_unique::<M>(&key, &unique)?;

        let new_version = actual_version + 1;
        self.entries.insert(
            key,
            StoredModel {
                data,
                version: new_version,
                seq,
                unique,
            },
        );

        Ok(Versioned {
            data: model.clone(),
            version: new_version,
        })
    }

    pub(crate) fn delete<M: Model>(&mut self, id: &str) -> bool {
        self.entries
            .remove(&make_key(M::COLLECTION, id))
            .is_some()
    }

    /// Matching documents in insertion order. A document that no longer
    /// decodes as `M` fails the whole listing, as it does in `get`.
    pub(crate) fn find<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError> {
        let prefix = collection_prefix(M::COLLECTION);
        let mut matching: Vec<&StoredModel> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, stored)| stored)
            .collect();
        matching.sort_by_key(|stored| stored.seq);

        let mut found = Vec::new();
        for stored in matching {
            let versioned = decode::<M>(stored)?;
            if predicate(&versioned.data) {
                found.push(versioned);
            }
        }
        Ok(found)
    }

    pub(crate) fn count<M: Model>(&self) -> usize {
        let prefix = collection_prefix(M::COLLECTION);
        self.entries
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count()
    }

    fn check_unique<M: Model>(
        &self,
        key: &str,
        unique: &[(String, String)],
    ) -> Result<(), ModelError> {
        if unique.is_empty() {
            return Ok(());
        }

        let prefix = collection_prefix(M::COLLECTION);
        for (other_key, stored) in &self.entries {
            if other_key == key || !other_key.starts_with(&prefix) {
                continue;
            }
            if let Some((field, value)) = unique.iter().find(|pair| stored.unique.contains(pair)) {
                return Err(ModelError::Duplicate {
                    collection: M::COLLECTION.to_string(),
                    field: field.clone(),
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}
