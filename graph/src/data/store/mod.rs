use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Custom scalars.
pub mod scalar;

mod values;

pub use values::{TryFromValue, ValueMap};

use scalar::{BigInt, Bytes};

/// An entity attribute name is represented as a string.
pub type Attribute = String;

/// The name of the attribute that holds an entity's id.
pub const ID: &str = "id";

pub const BYTES_SCALAR: &str = "Bytes";
pub const BIG_INT_SCALAR: &str = "BigInt";

/// The scalar types an attribute can have in `schema.graphql`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    BigInt,
    Bytes,
    ID,
    Int,
    String,
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<ValueType, Self::Err> {
        match s {
            "Boolean" => Ok(ValueType::Boolean),
            BIG_INT_SCALAR => Ok(ValueType::BigInt),
            BYTES_SCALAR => Ok(ValueType::Bytes),
            "ID" => Ok(ValueType::ID),
            "Int" => Ok(ValueType::Int),
            "String" => Ok(ValueType::String),
            s => Err(anyhow!("Type not available in this context: {}", s)),
        }
    }
}

impl ValueType {
    /// Check whether `value` can be stored in an attribute of this type
    pub fn is_assignable(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ValueType::Boolean, Value::Bool(_))
                | (ValueType::BigInt, Value::BigInt(_))
                | (ValueType::Bytes, Value::Bytes(_))
                | (ValueType::ID, Value::String(_))
                | (ValueType::Int, Value::Int(_))
                | (ValueType::String, Value::String(_))
        )
    }
}

/// An attribute value is represented as an enum with variants for all supported value types.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    String(String),
    Int(i32),
    BigInt(BigInt),
    Bool(bool),
    Bytes(Bytes),
    List(Vec<Value>),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Int(_) => "Int",
            Value::BigInt(_) => BIG_INT_SCALAR,
            Value::Bool(_) => "Boolean",
            Value::Bytes(_) => BYTES_SCALAR,
            Value::List(_) => "List",
            Value::Null => "Null",
        }
    }

    /// The plain JSON form of this value, the way a GraphQL response would
    /// show it: `BigInt` as a decimal string and `Bytes` as `0x` hex.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;

        match self {
            Value::String(s) => J::String(s.clone()),
            Value::Int(i) => J::from(*i),
            Value::BigInt(n) => J::String(n.to_string()),
            Value::Bool(b) => J::Bool(*b),
            Value::Bytes(b) => J::String(b.to_string()),
            Value::List(values) => J::Array(values.iter().map(Value::to_json).collect()),
            Value::Null => J::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Bytes(b) => write!(f, "{}", b),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Null => write!(f, "null"),
        }
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Value {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl<'a> From<&'a String> for Value {
    fn from(value: &'a String) -> Value {
        Value::String(value.clone())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Value {
        Value::BigInt(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Value {
        Value::Bytes(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Value {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// An entity is represented as a map of attribute names to values.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Entity(BTreeMap<Attribute, Value>);

impl Entity {
    /// Creates a new entity with no attributes set.
    pub fn new() -> Self {
        Entity(BTreeMap::new())
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.0.get(attr)
    }

    pub fn contains_key(&self, attr: &str) -> bool {
        self.0.contains_key(attr)
    }

    pub fn set(&mut self, attr: impl Into<Attribute>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(attr.into(), value.into())
    }

    pub fn remove(&mut self, attr: &str) -> Option<Value> {
        self.0.remove(attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the entity's id as a string, if it has one.
    pub fn id(&self) -> Option<&str> {
        self.get(ID).and_then(Value::as_str)
    }

    /// Merges an entity update `update` into this entity.
    ///
    /// If a key exists in both entities, the value from `update` is chosen.
    /// If a key only exists on one entity, the value from that entity is chosen.
    /// If a key is set to `Value::Null` in `update`, the key/value pair is set to `Value::Null`.
    pub fn merge(&mut self, update: Entity) {
        for (key, value) in update.0 {
            self.0.insert(key, value);
        }
    }

    /// Merges an entity update `update` into this entity, removing `Value::Null` values.
    ///
    /// If a key exists in both entities, the value from `update` is chosen.
    /// If a key only exists on one entity, the value from that entity is chosen.
    /// If a key is set to `Value::Null` in `update`, the key/value pair is removed.
    pub fn merge_remove_null_fields(&mut self, update: Entity) {
        for (key, value) in update.0 {
            match value {
                Value::Null => {
                    self.0.remove(&key);
                }
                _ => {
                    self.0.insert(key, value);
                }
            }
        }
    }

    /// The entity as a JSON object, with values in their plain JSON form
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(attr, value)| (attr.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl<'a> From<Vec<(&'a str, Value)>> for Entity {
    fn from(entries: Vec<(&'a str, Value)>) -> Entity {
        Entity(
            entries
                .into_iter()
                .map(|(k, v)| (String::from(k), v))
                .collect(),
        )
    }
}

impl FromIterator<(Attribute, Value)> for Entity {
    fn from_iter<I: IntoIterator<Item = (Attribute, Value)>>(iter: I) -> Self {
        Entity(iter.into_iter().collect())
    }
}

impl IntoIterator for Entity {
    type Item = (Attribute, Value);
    type IntoIter = std::collections::btree_map::IntoIter<Attribute, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Convenience macro for building entities, mostly in tests.
///
/// ```
/// use graph::entity;
///
/// let user = entity! { id: "0xabc", address: "0xabc" };
/// assert_eq!(Some("0xabc"), user.id());
/// ```
#[macro_export]
macro_rules! entity {
    ($($name:ident: $value:expr),* $(,)?) => {
        {
            let mut result = $crate::data::store::Entity::new();
            $(
                result.set(stringify!($name), $crate::data::store::Value::from($value));
            )*
            result
        }
    };
}
