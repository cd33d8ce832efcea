/// Traits and types for all system components.
pub mod components;

/// Common data types used throughout the indexer.
pub mod data;

/// Block pointers and block streams.
pub mod blockchain;

/// The entity schema, i.e. `schema.graphql`, and entity types and keys.
pub mod schema;

/// Configuration taken from environment variables.
pub mod env;

/// Logging setup.
pub mod log;

pub mod cheap_clone;

pub use anyhow;
pub use ethabi;
pub use futures03;
pub use itertools;
pub use serde_json;
pub use slog;
pub use thiserror;
pub use tokio;

/// A prelude that makes all system component traits and data types available.
///
/// Add the following code to import all traits and data types listed below at once.
///
/// ```
/// use graph::prelude::*;
/// ```
pub mod prelude {
    pub use ::anyhow::{self, anyhow, bail, ensure, Context, Error};
    pub use serde_derive::{Deserialize, Serialize};
    pub use ::slog::{self, crit, debug, error, info, o, trace, warn, Logger};
    pub use std::fmt::Debug;
    pub use std::sync::Arc;

    pub use crate::blockchain::block_stream::{BlockStream, BlockWithTriggers};
    pub use crate::blockchain::{BlockHash, BlockNumber, BlockPtr, BlockTime};
    pub use crate::cheap_clone::CheapClone;
    pub use crate::components::store::{
        EntityCache, EntityFilter, EntityModification, EntityOrder, EntityQuery,
        EntityRange, InMemoryStore, QueryStore, ReadStore, StoreError, WritableStore,
    };
    pub use crate::data::store::scalar::{BigInt, Bytes};
    pub use crate::data::store::{
        Attribute, Entity, TryFromValue, Value, ValueMap, ValueType, ID,
    };
    pub use crate::entity;
    pub use crate::env::{EnvVars, ENV_VARS};
    pub use crate::log::codes::LogCode;
    pub use crate::schema::{EntityKey, EntityType, InputSchema};
}
