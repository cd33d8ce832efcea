use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cheap_clone::CheapClone;

use super::EntityKey;

/// The type name of an entity. This is the string that is used in the
/// subgraph's GraphQL schema as `type NAME @entity { .. }`
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityType(String);

impl EntityType {
    /// Construct a new entity type. Ideally, this is only called when
    /// `entity_type` either comes from the GraphQL schema, or from
    /// the store from fields that are known to contain a valid entity type
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self(entity_type.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Build the key for the entity of this type with the given id
    pub fn key(&self, id: impl Into<String>) -> EntityKey {
        EntityKey::new(self.clone(), id.into())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for EntityType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl CheapClone for EntityType {}

impl std::fmt::Debug for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntityType({})", self.0)
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType::new(s)
    }
}
