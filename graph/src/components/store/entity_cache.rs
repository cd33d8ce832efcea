use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Debug};
use std::sync::Arc;

use super::{EntityModification, EntityOp, ReadStore, StoreError};
use crate::data::store::{Entity, Value, ID};
use crate::env::ENV_VARS;
use crate::schema::{EntityKey, InputSchema};

/// A cache for entities from the store that provides the basic functionality
/// needed for the store interactions in the mappings. This struct tracks
/// how entities are modified, and caches all entities looked up from the
/// store. The cache makes sure that
///   (1) no entity appears in more than one operation
///   (2) only entities that will actually be changed from what they
///       are in the store are changed
pub struct EntityCache {
    /// The state of entities in the store. An entry of `None`
    /// means that the entity is not present in the store
    current: HashMap<EntityKey, Option<Entity>>,

    /// The accumulated changes to an entity.
    updates: HashMap<EntityKey, EntityOp>,

    // Updates for a currently executing handler.
    handler_updates: HashMap<EntityKey, EntityOp>,

    // Marks whether updates should go in `handler_updates`.
    in_handler: bool,

    /// The store is only used to read entities.
    pub store: Arc<dyn ReadStore>,

    schema: InputSchema,
}

impl Debug for EntityCache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("current", &self.current)
            .field("updates", &self.updates)
            .finish()
    }
}

impl EntityCache {
    pub fn new(store: Arc<dyn ReadStore>) -> Self {
        Self {
            current: HashMap::new(),
            updates: HashMap::new(),
            handler_updates: HashMap::new(),
            in_handler: false,
            schema: store.input_schema(),
            store,
        }
    }

    /// Start collecting the changes of one handler separately so that they
    /// can be dropped if the handler fails.
    pub fn enter_handler(&mut self) {
        assert!(!self.in_handler);
        self.in_handler = true;
    }

    pub fn exit_handler(&mut self) {
        assert!(self.in_handler);
        self.in_handler = false;

        // Apply all handler updates to the main `updates`.
        let handler_updates = Vec::from_iter(self.handler_updates.drain());
        for (key, op) in handler_updates {
            self.entity_op(key, op)
        }
    }

    pub fn exit_handler_and_discard_changes(&mut self) {
        assert!(self.in_handler);
        self.in_handler = false;
        self.handler_updates.clear();
    }

    pub fn get(&mut self, key: &EntityKey) -> Result<Option<Entity>, StoreError> {
        // Get the current entity, apply any updates from `updates`, then
        // from `handler_updates`.
        let mut entity = self.current_entity(key)?;

        if let Some(op) = self.updates.get(key).cloned() {
            entity = op.apply_to(entity)
        }
        if let Some(op) = self.handler_updates.get(key).cloned() {
            entity = op.apply_to(entity)
        }
        Ok(entity)
    }

    pub fn remove(&mut self, key: EntityKey) {
        self.entity_op(key, EntityOp::Remove);
    }

    /// Store the `entity` under the given `key`. The `entity` may be only a
    /// partial entity; the cache will ensure partial updates get merged
    /// with existing data. The merged entity will be validated against the
    /// schema, and any errors will result in an `Err` being returned.
    pub fn set(&mut self, key: EntityKey, mut entity: Entity) -> Result<(), StoreError> {
        // Set the id if there isn't one yet, and make sure that a
        // previously set id agrees with the one in the `key`
        match entity.get(ID) {
            Some(Value::String(id)) if id != &key.entity_id => {
                return Err(StoreError::EntityValidationError(format!(
                    "Value of {} attribute 'id' conflicts with ID passed to `store.set()`: \
                     {} != {}",
                    key.entity_type, id, key.entity_id,
                )));
            }
            Some(_) => {
                // The validation will catch a type mismatch
            }
            None => {
                let value = self.schema.id_value(&key)?;
                entity.set(ID, value);
            }
        }

        self.entity_op(key.clone(), EntityOp::Update(entity));

        if !ENV_VARS.disable_schema_validation {
            let entity = self.get(&key)?.ok_or_else(|| {
                StoreError::EntityValidationError(format!(
                    "Failed to read entity {} back from cache",
                    key
                ))
            })?;
            self.schema.validate(&key, &entity)?;
        }

        Ok(())
    }

    fn entity_op(&mut self, key: EntityKey, op: EntityOp) {
        use std::collections::hash_map::Entry;
        let updates = match self.in_handler {
            true => &mut self.handler_updates,
            false => &mut self.updates,
        };

        match updates.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(op);
            }
            Entry::Occupied(mut entry) => entry.get_mut().accumulate(op),
        }
    }

    // Cached lookup of an entity in the store
    fn current_entity(&mut self, key: &EntityKey) -> Result<Option<Entity>, StoreError> {
        match self.current.get(key) {
            Some(entity) => Ok(entity.clone()),
            None => {
                let entity = self.store.get(key)?;
                self.current.insert(key.clone(), entity.clone());
                Ok(entity)
            }
        }
    }

    /// Return the changes that have been made via `set` and `remove` as
    /// `EntityModification`, making sure to only produce one when a change
    /// to the current state is actually needed.
    pub fn as_modifications(mut self) -> Result<Vec<EntityModification>, StoreError> {
        assert!(!self.in_handler);

        // The first step is to make sure all entities being set are in `self.current`.
        let missing: BTreeSet<EntityKey> = self
            .updates
            .keys()
            .filter(|key| !self.current.contains_key(key))
            .cloned()
            .collect();

        for (entity_key, entity) in self.store.get_many(missing)? {
            self.current.insert(entity_key, Some(entity));
        }

        let mut mods = Vec::new();
        for (key, update) in self.updates {
            use EntityModification::*;

            let current = self.current.remove(&key).and_then(|entity| entity);
            let modification = match (current, update) {
                // Entity was created
                (None, EntityOp::Update(updates)) | (None, EntityOp::Overwrite(updates)) => {
                    // Merging with an empty entity removes null fields.
                    let mut data = Entity::new();
                    data.merge_remove_null_fields(updates);
                    Some(Insert { key, data })
                }
                // Entity may have been changed
                (Some(current), EntityOp::Update(updates)) => {
                    let mut data = current.clone();
                    data.merge_remove_null_fields(updates);
                    if current != data {
                        Some(Overwrite { key, data })
                    } else {
                        None
                    }
                }
                // Entity was removed and then updated, so it will be overwritten
                (Some(current), EntityOp::Overwrite(updates)) => {
                    let mut data = Entity::new();
                    data.merge_remove_null_fields(updates);
                    if current != data {
                        Some(Overwrite { key, data })
                    } else {
                        None
                    }
                }
                // Existing entity was deleted
                (Some(_), EntityOp::Remove) => Some(Remove { key }),
                // Entity was deleted, but it doesn't exist in the store
                (None, EntityOp::Remove) => None,
            };
            if let Some(modification) = modification {
                mods.push(modification)
            }
        }

        // Sorted so that stores apply a block's changes in a stable order
        mods.sort_by(|a, b| a.entity_ref().cmp(b.entity_ref()));
        Ok(mods)
    }
}
