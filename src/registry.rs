// 🗂️ Registry - every live record of the session, keyed by "Kind.id"
//
// The single source of truth while the console runs. Owned by the console and
// passed around explicitly; there is no process-wide instance.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::entities::{Entity, Kind, CLASS_TAG};
use crate::error::RegistryError;
use crate::storage::Document;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Insertion order; reload keeps document order
    objects: IndexMap<String, Entity>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            objects: IndexMap::new(),
        }
    }

    /// Composite key for a kind and id
    pub fn key(kind: Kind, id: &str) -> String {
        format!("{}.{}", kind, id)
    }

    /// The live mapping (not a copy)
    pub fn all(&self) -> &IndexMap<String, Entity> {
        &self.objects
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Records of one kind, in registry order
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Entity> {
        self.objects.values().filter(move |entity| entity.kind() == kind)
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.of_kind(kind).count()
    }

    /// Insert under the entity's own key, replacing any previous holder.
    /// Returns the key.
    pub fn register(&mut self, entity: Entity) -> Result<String, RegistryError> {
        if entity.id().is_empty() {
            return Err(RegistryError::MissingIdentity {
                kind: entity.kind().name().to_string(),
            });
        }

        let key = entity.key();
        self.objects.insert(key.clone(), entity);
        Ok(key)
    }

    /// Remove and return the entity; None if the key is unknown
    pub fn remove(&mut self, key: &str) -> Option<Entity> {
        self.objects.shift_remove(key)
    }

    /// Replace the whole mapping with the records of a persisted document.
    ///
    /// Entries that can't be rebuilt (not an object, unknown kind tag,
    /// missing id, bad timestamps) are skipped with a warning; the rest load.
    /// Returns how many records were loaded.
    pub fn load(&mut self, document: &Document) -> usize {
        let mut objects = IndexMap::with_capacity(document.len());

        for (key, value) in document {
            let Value::Object(dict) = value else {
                warn!(key = %key, "skipping persisted entry that is not an object");
                continue;
            };

            let tag = dict
                .get(CLASS_TAG)
                .and_then(Value::as_str)
                .unwrap_or_else(|| key.split('.').next().unwrap_or_default());

            let Some(kind) = Kind::from_name(tag) else {
                warn!(key = %key, kind = tag, "skipping persisted entry with unknown kind");
                continue;
            };

            match Entity::from_dict(kind, dict) {
                Ok(entity) => {
                    objects.insert(entity.key(), entity);
                }
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable persisted entry"),
            }
        }

        self.objects = objects;
        self.objects.len()
    }

    /// Dict form of every record, keyed like the registry
    pub fn to_document(&self) -> Document {
        self.objects
            .iter()
            .map(|(key, entity)| (key.clone(), Value::Object(entity.to_dict())))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
