use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Error;
use graphql_parser::schema as s;
use thiserror::Error;

use crate::cheap_clone::CheapClone;
use crate::components::store::StoreError;
use crate::data::store::{Entity, Value, ValueType, ID};

use super::{EntityKey, EntityType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaValidationError {
    #[error("@entity directive missing on the following type: {0}")]
    EntityDirectivesMissing(String),
    #[error("Entity type `{0}` does not have an `id` field")]
    IdFieldMissing(String),
    #[error("The `id` field of entity type `{0}` must have type `ID!`, `String!` or `Bytes!`")]
    IdTypeInvalid(String),
    #[error("GraphQL type `{0}` has field `{1}` with type `{2}` which is not defined")]
    FieldTypeUnknown(String, String, String),
}

/// What a field refers to: either a scalar, or another entity by its id
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldBase {
    Scalar(ValueType),
    Reference(EntityType),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldType {
    pub base: FieldBase,
    pub list: bool,
    pub non_null: bool,
}

impl FieldType {
    fn accepts_item(&self, value: &Value) -> bool {
        match &self.base {
            FieldBase::Scalar(value_type) => value_type.is_assignable(value),
            // References are stored as the id of the referenced entity
            FieldBase::Reference(_) => matches!(value, Value::String(_)),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match (self.list, value) {
            (_, Value::Null) => !self.non_null,
            (true, Value::List(items)) => items.iter().all(|item| self.accepts_item(item)),
            (true, _) => false,
            (false, value) => self.accepts_item(value),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let base = match &self.base {
            FieldBase::Scalar(value_type) => format!("{:?}", value_type),
            FieldBase::Reference(entity_type) => entity_type.to_string(),
        };
        match (self.list, self.non_null) {
            (true, true) => write!(f, "[{}!]!", base),
            (true, false) => write!(f, "[{}!]", base),
            (false, true) => write!(f, "{}!", base),
            (false, false) => write!(f, "{}", base),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectType {
    pub name: EntityType,
    pub fields: BTreeMap<String, Field>,
}

impl ObjectType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

/// The internal representation of the indexer's `schema.graphql`. Any code
/// that writes entities checks them against this schema; queries use it to
/// know which entity types exist.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSchema {
    inner: Arc<Inner>,
}

#[derive(Debug, PartialEq)]
struct Inner {
    types: BTreeMap<EntityType, ObjectType>,
}

impl CheapClone for InputSchema {}

impl InputSchema {
    /// Parse and validate the GraphQL schema in `raw`
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let document = s::parse_schema::<String>(raw)?;

        let objects: Vec<&s::ObjectType<'_, String>> = document
            .definitions
            .iter()
            .filter_map(|def| match def {
                s::Definition::TypeDefinition(s::TypeDefinition::Object(obj)) => Some(obj),
                _ => None,
            })
            .collect();

        if let Some(obj) = objects
            .iter()
            .find(|obj| !obj.directives.iter().any(|dir| dir.name == "entity"))
        {
            return Err(SchemaValidationError::EntityDirectivesMissing(obj.name.clone()).into());
        }

        let names: Vec<&str> = objects.iter().map(|obj| obj.name.as_str()).collect();
        let mut types = BTreeMap::new();
        for obj in &objects {
            let mut fields = BTreeMap::new();
            for field in &obj.fields {
                let field_type = resolve_type(&obj.name, &field.name, &field.field_type, &names)?;
                fields.insert(
                    field.name.clone(),
                    Field {
                        name: field.name.clone(),
                        field_type,
                    },
                );
            }

            match fields.get(ID).map(|field| &field.field_type) {
                None => return Err(SchemaValidationError::IdFieldMissing(obj.name.clone()).into()),
                Some(FieldType {
                    base: FieldBase::Scalar(ValueType::ID | ValueType::String | ValueType::Bytes),
                    list: false,
                    non_null: true,
                }) => {}
                Some(_) => {
                    return Err(SchemaValidationError::IdTypeInvalid(obj.name.clone()).into())
                }
            }

            let name = EntityType::new(obj.name.clone());
            types.insert(name.clone(), ObjectType { name, fields });
        }

        Ok(InputSchema {
            inner: Arc::new(Inner { types }),
        })
    }

    pub fn object_type(&self, entity_type: &EntityType) -> Option<&ObjectType> {
        self.inner.types.get(entity_type)
    }

    pub fn has_entity_type(&self, name: &str) -> bool {
        self.inner.types.contains_key(name)
    }

    /// Construct a value for the entity type's id attribute
    pub fn id_value(&self, key: &EntityKey) -> Result<Value, StoreError> {
        self.object_type(&key.entity_type)
            .ok_or_else(|| StoreError::UnknownEntityType(key.entity_type.to_string()))?;
        Ok(Value::String(key.entity_id.clone()))
    }

    /// Check that `entity` is a complete and well-typed entity of the type
    /// that `key` names, and that its `id` agrees with `key`
    pub fn validate(&self, key: &EntityKey, entity: &Entity) -> Result<(), StoreError> {
        let object_type = self
            .object_type(&key.entity_type)
            .ok_or_else(|| StoreError::UnknownEntityType(key.entity_type.to_string()))?;

        match entity.get(ID) {
            Some(Value::String(id)) if id == &key.entity_id => {}
            Some(other) => {
                return Err(StoreError::EntityValidationError(format!(
                    "Entity {}: the value of `id` ({}) does not match the key",
                    key, other
                )))
            }
            None => {
                return Err(StoreError::EntityValidationError(format!(
                    "Entity {}: missing value for the `id` field",
                    key
                )))
            }
        }

        for (attr, value) in entity.iter() {
            let field = object_type.field(attr).ok_or_else(|| {
                StoreError::UnknownAttribute(key.entity_type.to_string(), attr.clone())
            })?;
            if !field.field_type.accepts(value) {
                return Err(StoreError::EntityValidationError(format!(
                    "Entity {}: the value `{}` for field `{}` must have type {} but has type {}",
                    key,
                    value,
                    attr,
                    field.field_type,
                    value.type_name()
                )));
            }
        }

        if let Some(missing) = object_type
            .fields
            .values()
            .find(|field| field.field_type.non_null && !entity.contains_key(&field.name))
        {
            return Err(StoreError::EntityValidationError(format!(
                "Entity {}: missing value for non-nullable field `{}`",
                key, missing.name
            )));
        }

        Ok(())
    }
}

fn resolve_type(
    type_name: &str,
    field_name: &str,
    ty: &s::Type<'_, String>,
    entity_types: &[&str],
) -> Result<FieldType, SchemaValidationError> {
    fn base_name<'a>(ty: &'a s::Type<'_, String>) -> &'a str {
        match ty {
            s::Type::NamedType(name) => name.as_str(),
            s::Type::ListType(inner) | s::Type::NonNullType(inner) => base_name(inner),
        }
    }

    let (non_null, inner) = match ty {
        s::Type::NonNullType(inner) => (true, inner.as_ref()),
        ty => (false, ty),
    };
    let list = matches!(inner, s::Type::ListType(_));
    let name = base_name(inner);

    let base = match name.parse::<ValueType>() {
        Ok(value_type) => FieldBase::Scalar(value_type),
        Err(_) if entity_types.contains(&name) => FieldBase::Reference(EntityType::new(name)),
        Err(_) => {
            return Err(SchemaValidationError::FieldTypeUnknown(
                type_name.to_string(),
                field_name.to_string(),
                name.to_string(),
            ))
        }
    };

    Ok(FieldType {
        base,
        list,
        non_null,
    })
}
