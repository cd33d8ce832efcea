use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{EntityModification, EntityQuery, QueryStore, ReadStore, StoreError, WritableStore};
use crate::blockchain::BlockPtr;
use crate::data::store::Entity;
use crate::schema::{EntityKey, InputSchema};

/// A store that keeps everything in memory. Used in tests and for one-off
/// runs that do not need to persist anything.
pub struct InMemoryStore {
    schema: InputSchema,
    entities: RwLock<BTreeMap<EntityKey, Entity>>,
    block_ptr: RwLock<Option<BlockPtr>>,
}

impl InMemoryStore {
    pub fn new(schema: InputSchema) -> Self {
        InMemoryStore {
            schema,
            entities: RwLock::new(BTreeMap::new()),
            block_ptr: RwLock::new(None),
        }
    }

    /// The number of entities in the store, across all types
    pub fn entity_count(&self) -> Result<usize, StoreError> {
        Ok(self.entities.read()?.len())
    }
}

impl ReadStore for InMemoryStore {
    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreError> {
        Ok(self.entities.read()?.get(key).cloned())
    }

    fn input_schema(&self) -> InputSchema {
        self.schema.clone()
    }
}

impl WritableStore for InMemoryStore {
    fn block_ptr(&self) -> Result<Option<BlockPtr>, StoreError> {
        Ok(self.block_ptr.read()?.clone())
    }

    fn transact_block_operations(
        &self,
        block_ptr_to: BlockPtr,
        mods: Vec<EntityModification>,
    ) -> Result<(), StoreError> {
        // Hold both locks so readers never see a half-applied block
        let mut entities = self.entities.write()?;
        let mut block_ptr = self.block_ptr.write()?;

        for modification in mods {
            match modification {
                EntityModification::Insert { key, data }
                | EntityModification::Overwrite { key, data } => {
                    entities.insert(key, data);
                }
                EntityModification::Remove { key } => {
                    entities.remove(&key);
                }
            }
        }
        *block_ptr = Some(block_ptr_to);
        Ok(())
    }
}

impl QueryStore for InMemoryStore {
    fn find(&self, query: EntityQuery) -> Result<Vec<Entity>, StoreError> {
        if !self.schema.has_entity_type(query.entity_type.as_str()) {
            return Err(StoreError::UnknownEntityType(query.entity_type.to_string()));
        }

        let entities = self.entities.read()?;
        let candidates = entities
            .iter()
            .filter(|(key, _)| key.entity_type == query.entity_type)
            .map(|(_, entity)| entity.clone());
        query.select(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::store::EntityOrder;
    use crate::data::store::scalar::BigInt;
    use crate::data::store::Value;
    use crate::entity;
    use crate::schema::EntityType;
    use maplit::btreeset;

    fn store() -> InMemoryStore {
        let schema = InputSchema::parse(
            "type Post @entity { id: ID!, author: String!, createdAt: BigInt! }",
        )
        .unwrap();
        let store = InMemoryStore::new(schema);
        let mods = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, id)| EntityModification::Insert {
                key: EntityType::new("Post").key(*id),
                data: entity! { id: *id, author: "alice", createdAt: BigInt::from(i as u64) },
            })
            .collect();
        store
            .transact_block_operations((ethabi::Hash::zero(), 3).into(), mods)
            .unwrap();
        store
    }

    #[test]
    fn get_many_skips_missing() {
        let store = store();
        let post = EntityType::new("Post");
        let found = store
            .get_many(btreeset! { post.key("a"), post.key("c"), post.key("z") })
            .unwrap();

        assert_eq!(
            vec!["a", "c"],
            found.keys().map(|key| key.entity_id.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(3, store.entity_count().unwrap());
        assert_eq!(Some(3), store.block_ptr().unwrap().map(|ptr| ptr.number));
    }

    #[test]
    fn find_rejects_unknown_types() {
        let store = store();
        let posts = store
            .find(
                EntityQuery::new(EntityType::new("Post"))
                    .order(EntityOrder::Descending("createdAt".to_string())),
            )
            .unwrap();
        assert_eq!(Some(&Value::from("c")), posts[0].get("id"));

        let err = store
            .find(EntityQuery::new(EntityType::new("Profile")))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownEntityType(_)));
    }
}
