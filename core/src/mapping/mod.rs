//! One handler per LinkFolio event. Handlers read and write entities
//! through a `MappingContext`; everything a handler writes becomes visible
//! together once the handler returns successfully.

use graph::prelude::*;
use linkfolio_chain_ethereum::LinkFolioEvent;
use thiserror::Error;

use crate::entities::TypedEntity;

mod ids;
mod note;
mod post;
mod profile;

pub use ids::{note_id, post_id, user_id};
pub use note::handle_note_left;
pub use post::handle_post_created;
pub use profile::{
    handle_profile_created, handle_profile_deleted, handle_profile_updated, ProfileState,
};

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("entity {key} in the store is not a valid {entity_type}: {error:#}")]
    Unreadable {
        key: EntityKey,
        entity_type: &'static str,
        error: Error,
    },
}

/// What a handler gets to work with: the entities as of the current event,
/// and the timestamp of the block the event is in.
pub struct MappingContext<'a> {
    cache: &'a mut EntityCache,
    timestamp: BigInt,
    logger: &'a Logger,
}

impl<'a> MappingContext<'a> {
    pub fn new(cache: &'a mut EntityCache, timestamp: BigInt, logger: &'a Logger) -> Self {
        MappingContext {
            cache,
            timestamp,
            logger,
        }
    }

    /// The timestamp of the current block
    pub fn timestamp(&self) -> BigInt {
        self.timestamp.clone()
    }

    pub fn logger(&self) -> &Logger {
        self.logger
    }

    pub fn load<T: TypedEntity>(&mut self, id: &str) -> Result<Option<T>, MappingError> {
        let key = T::key_for(id);
        match self.cache.get(&key)? {
            None => Ok(None),
            Some(entity) => T::from_entity(&entity)
                .map(Some)
                .map_err(|error| MappingError::Unreadable {
                    key,
                    entity_type: T::TYPE,
                    error,
                }),
        }
    }

    pub fn save<T: TypedEntity>(&mut self, entity: &T) -> Result<(), MappingError> {
        self.cache.set(entity.key(), entity.to_entity())?;
        Ok(())
    }

    pub fn remove<T: TypedEntity>(&mut self, id: &str) {
        self.cache.remove(T::key_for(id));
    }
}

/// Dispatch `event` to its handler
pub fn handle_event(ctx: &mut MappingContext, event: &LinkFolioEvent) -> Result<(), MappingError> {
    match event {
        LinkFolioEvent::ProfileCreated(event) => handle_profile_created(ctx, event),
        LinkFolioEvent::ProfileUpdated(event) => handle_profile_updated(ctx, event),
        LinkFolioEvent::ProfileDeleted(event) => handle_profile_deleted(ctx, event),
        LinkFolioEvent::NoteLeft(event) => handle_note_left(ctx, event),
        LinkFolioEvent::PostCreated(event) => handle_post_created(ctx, event),
    }
}
