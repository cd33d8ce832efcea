use anyhow::{anyhow, Error};

use super::scalar::{BigInt, Bytes};
use super::{Entity, Value};

/// Conversion from a stored `Value` into a Rust type. Used to turn untyped
/// entities back into the typed structs the mappings work with.
pub trait TryFromValue: Sized {
    fn try_from_value(value: &Value) -> Result<Self, Error>;
}

impl TryFromValue for Value {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl TryFromValue for String {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(anyhow!("Cannot parse value into a string: {:?}", value)),
        }
    }
}

impl TryFromValue for BigInt {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::BigInt(n) => Ok(n.clone()),
            _ => Err(anyhow!("Cannot parse value into a BigInt: {:?}", value)),
        }
    }
}

impl TryFromValue for Bytes {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            _ => Err(anyhow!("Cannot parse value into Bytes: {:?}", value)),
        }
    }
}

impl<T> TryFromValue for Vec<T>
where
    T: TryFromValue,
{
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::List(values) => values.iter().try_fold(vec![], |mut values, value| {
                values.push(T::try_from_value(value)?);
                Ok(values)
            }),
            _ => Err(anyhow!("Cannot parse value into a vector: {:?}", value)),
        }
    }
}

pub trait ValueMap {
    fn get_required<T: TryFromValue>(&self, key: &str) -> Result<T, Error>;
    fn get_optional<T: TryFromValue>(&self, key: &str) -> Result<Option<T>, Error>;
}

impl ValueMap for Entity {
    fn get_required<T>(&self, key: &str) -> Result<T, Error>
    where
        T: TryFromValue,
    {
        self.get(key)
            .ok_or_else(|| anyhow!("Required field `{}` not set", key))
            .and_then(|value| {
                T::try_from_value(value).map_err(|e| e.context(format!("field `{}`", key)))
            })
    }

    fn get_optional<T>(&self, key: &str) -> Result<Option<T>, Error>
    where
        T: TryFromValue,
    {
        self.get(key).map_or(Ok(None), |value| match value {
            Value::Null => Ok(None),
            _ => T::try_from_value(value).map(Some),
        })
    }
}
