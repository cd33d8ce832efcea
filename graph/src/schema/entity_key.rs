use std::fmt;

use super::EntityType;

/// Key by which an individual entity in the store can be accessed. Stores
/// only the entity type and id.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    /// Name of the entity type.
    pub entity_type: EntityType,

    /// ID of the individual entity.
    pub entity_id: String,
}

impl EntityKey {
    pub(in crate::schema) fn new(entity_type: EntityType, entity_id: String) -> Self {
        Self {
            entity_type,
            entity_id,
        }
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityKey({}[{}])", self.entity_type, self.entity_id)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.entity_type, self.entity_id)
    }
}
