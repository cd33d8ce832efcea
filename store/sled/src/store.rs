use std::path::Path;

use borsh::{BorshDeserialize, BorshSerialize};
use graph::prelude::*;
use sled::{Batch, Db};
use thiserror::Error;

const ENTITY_PREFIX: &str = "e/";
const BLOCK_PTR_KEY: &str = "m/block_ptr";

/// What is stored under an entity key: the entity as JSON and the block
/// that last wrote it.
#[derive(BorshSerialize, BorshDeserialize)]
struct StoredEntity {
    block_number: BlockNumber,
    data: Box<[u8]>,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct StoredBlockPtr {
    hash: Box<[u8]>,
    number: BlockNumber,
}

#[derive(Debug, Error)]
pub enum SledStoreError {
    #[error("sled returned an error: {0}")]
    SledError(#[from] sled::Error),
    #[error("stored value under `{key}` can not be decoded: {error}")]
    Corrupt { key: String, error: String },
}

impl From<SledStoreError> for StoreError {
    fn from(e: SledStoreError) -> Self {
        match e {
            SledStoreError::Corrupt { .. } => StoreError::Serialization(e.to_string()),
            SledStoreError::SledError(_) => StoreError::Unknown(e.into()),
        }
    }
}

/// Entities and the block pointer in one sled database. Every block is
/// written with a single batch, so after a crash the store holds either all
/// of a block or none of it.
pub struct SledStore {
    db: Db,
    schema: InputSchema,
    logger: Logger,
}

impl SledStore {
    /// Open the database at `path`, creating it if it does not exist
    pub fn open(
        path: impl AsRef<Path>,
        schema: InputSchema,
        logger: &Logger,
    ) -> Result<Self, SledStoreError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        let logger = logger.new(o!("component" => "SledStore"));
        info!(logger, "Opened store"; "path" => path.display().to_string(),
            "recovered" => db.was_recovered());
        Ok(Self { db, schema, logger })
    }

    /// A store that is deleted when it is dropped
    pub fn temporary(schema: InputSchema, logger: &Logger) -> Result<Self, SledStoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        let logger = logger.new(o!("component" => "SledStore"));
        Ok(Self { db, schema, logger })
    }

    fn entity_key(key: &EntityKey) -> String {
        format!("{}{}/{}", ENTITY_PREFIX, key.entity_type, key.entity_id)
    }

    fn type_prefix(entity_type: &EntityType) -> String {
        format!("{}{}/", ENTITY_PREFIX, entity_type)
    }

    fn decode_entity(key: &[u8], bytes: &[u8]) -> Result<Entity, SledStoreError> {
        let corrupt = |error: String| SledStoreError::Corrupt {
            key: String::from_utf8_lossy(key).into_owned(),
            error,
        };
        let stored = StoredEntity::try_from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
        serde_json::from_slice(&stored.data).map_err(|e| corrupt(e.to_string()))
    }

    fn encode_entity(block_number: BlockNumber, entity: &Entity) -> Result<Vec<u8>, StoreError> {
        let stored = StoredEntity {
            block_number,
            data: serde_json::to_vec(entity)?.into_boxed_slice(),
        };
        borsh::to_vec(&stored).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// The number of entities in the store, across all types
    pub fn entity_count(&self) -> usize {
        self.db.scan_prefix(ENTITY_PREFIX).count()
    }
}

impl ReadStore for SledStore {
    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreError> {
        let db_key = Self::entity_key(key);
        match self.db.get(&db_key).map_err(SledStoreError::from)? {
            None => Ok(None),
            Some(bytes) => Ok(Some(Self::decode_entity(db_key.as_bytes(), &bytes)?)),
        }
    }

    fn input_schema(&self) -> InputSchema {
        self.schema.cheap_clone()
    }
}

impl WritableStore for SledStore {
    fn block_ptr(&self) -> Result<Option<BlockPtr>, StoreError> {
        let bytes = match self.db.get(BLOCK_PTR_KEY).map_err(SledStoreError::from)? {
            None => return Ok(None),
            Some(bytes) => bytes,
        };
        let stored = StoredBlockPtr::try_from_slice(&bytes).map_err(|e| SledStoreError::Corrupt {
            key: BLOCK_PTR_KEY.to_string(),
            error: e.to_string(),
        })?;
        Ok(Some(BlockPtr::new(BlockHash(stored.hash), stored.number)))
    }

    fn transact_block_operations(
        &self,
        block_ptr_to: BlockPtr,
        mods: Vec<EntityModification>,
    ) -> Result<(), StoreError> {
        let mut batch = Batch::default();
        let count = mods.len();

        for modification in mods {
            match modification {
                EntityModification::Insert { key, data }
                | EntityModification::Overwrite { key, data } => {
                    let value = Self::encode_entity(block_ptr_to.number, &data)?;
                    batch.insert(Self::entity_key(&key).as_bytes(), value);
                }
                EntityModification::Remove { key } => {
                    batch.remove(Self::entity_key(&key).as_bytes());
                }
            }
        }

        let ptr = StoredBlockPtr {
            hash: block_ptr_to.hash.0.clone(),
            number: block_ptr_to.number,
        };
        let ptr = borsh::to_vec(&ptr).map_err(|e| StoreError::Serialization(e.to_string()))?;
        batch.insert(BLOCK_PTR_KEY, ptr);

        self.db.apply_batch(batch).map_err(SledStoreError::from)?;
        trace!(self.logger, "Wrote block";
            "block" => &block_ptr_to,
            "modifications" => count);
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush().map_err(SledStoreError::from)?;
        Ok(())
    }
}

impl QueryStore for SledStore {
    fn find(&self, query: EntityQuery) -> Result<Vec<Entity>, StoreError> {
        if !self.schema.has_entity_type(query.entity_type.as_str()) {
            return Err(StoreError::UnknownEntityType(query.entity_type.to_string()));
        }

        let entities = self
            .db
            .scan_prefix(Self::type_prefix(&query.entity_type))
            .map(|kv| {
                let (key, value) = kv.map_err(SledStoreError::from)?;
                Ok(Self::decode_entity(&key, &value)?)
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        query.select(entities)
    }
}
