mod entity_key;
mod entity_type;
mod input_schema;

pub use entity_key::EntityKey;
pub use entity_type::EntityType;
pub use input_schema::{Field, FieldType, InputSchema, ObjectType, SchemaValidationError};
