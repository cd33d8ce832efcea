use std::collections::{BTreeMap, BTreeSet};

use super::{EntityModification, EntityQuery, StoreError};
use crate::blockchain::BlockPtr;
use crate::data::store::Entity;
use crate::schema::{EntityKey, InputSchema};

/// A view of the store that is only used to read entities. This is what the
/// `EntityCache` reads through while handlers run.
pub trait ReadStore: Send + Sync + 'static {
    /// Looks up an entity using the given store key.
    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreError>;

    /// Look up multiple entities. Keys that are not found are missing from
    /// the result.
    fn get_many(
        &self,
        keys: BTreeSet<EntityKey>,
    ) -> Result<BTreeMap<EntityKey, Entity>, StoreError> {
        let mut entities = BTreeMap::new();
        for key in keys {
            if let Some(entity) = self.get(&key)? {
                entities.insert(key, entity);
            }
        }
        Ok(entities)
    }

    fn input_schema(&self) -> InputSchema;
}

/// A store that the runner writes processed blocks into
pub trait WritableStore: ReadStore {
    /// Get a pointer to the most recently processed block, or `None` if
    /// nothing has been indexed yet.
    fn block_ptr(&self) -> Result<Option<BlockPtr>, StoreError>;

    /// Apply the entity modifications of one block and advance the block
    /// pointer to `block_ptr_to`. Either all of it becomes visible or none
    /// of it does.
    fn transact_block_operations(
        &self,
        block_ptr_to: BlockPtr,
        mods: Vec<EntityModification>,
    ) -> Result<(), StoreError>;

    /// Make sure everything written so far is durable.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub trait QueryStore: Send + Sync {
    /// Queries the store for entities that match the query. Entities are
    /// returned in the order the query asks for.
    fn find(&self, query: EntityQuery) -> Result<Vec<Entity>, StoreError>;
}
