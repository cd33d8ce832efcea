//! The LinkFolio mappings: turning decoded contract events into `User`,
//! `Profile`, `Note` and `Post` entities, and the runner that applies them
//! block by block.

use graph::prelude::{Error, InputSchema};

pub mod entities;
pub mod mapping;
pub mod query;
mod subgraph;

pub use subgraph::{BlockProcessingError, IndexingRunner};

/// The GraphQL schema of the entities the mappings write
pub const SCHEMA_GRAPHQL: &str = include_str!("../schema.graphql");

pub fn input_schema() -> Result<InputSchema, Error> {
    InputSchema::parse(SCHEMA_GRAPHQL)
}
