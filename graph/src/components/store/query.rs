use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;

use super::StoreError;
use crate::data::store::scalar::BigInt;
use crate::data::store::{Attribute, Entity, Value, ID};
use crate::env::ENV_VARS;
use crate::schema::EntityType;

/// Supported types of store filters.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityFilter {
    And(Vec<EntityFilter>),
    Or(Vec<EntityFilter>),
    Equal(Attribute, Value),
    Not(Attribute, Value),
    GreaterThan(Attribute, Value),
    LessThan(Attribute, Value),
    In(Attribute, Vec<Value>),
    Contains(Attribute, Value),
    ContainsNoCase(Attribute, Value),
    StartsWith(Attribute, Value),
    StartsWithNoCase(Attribute, Value),
}

// A somewhat concise string representation of a filter
impl fmt::Display for EntityFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use EntityFilter::*;

        match self {
            And(fs) => {
                write!(f, "({})", fs.iter().map(|f| f.to_string()).join(" and "))
            }
            Or(fs) => {
                write!(f, "({})", fs.iter().map(|f| f.to_string()).join(" or "))
            }
            Equal(a, v) => write!(f, "{a} = {v}"),
            Not(a, v) => write!(f, "{a} != {v}"),
            GreaterThan(a, v) => write!(f, "{a} > {v}"),
            LessThan(a, v) => write!(f, "{a} < {v}"),
            In(a, vs) => write!(f, "{a} in ({})", vs.iter().map(|v| v.to_string()).join(",")),
            Contains(a, v) => write!(f, "{a} ~ *{v}*"),
            ContainsNoCase(a, v) => write!(f, "{a} ~ *{v}*i"),
            StartsWith(a, v) => write!(f, "{a} ~ ^{v}*"),
            StartsWithNoCase(a, v) => write!(f, "{a} ~ ^{v}*i"),
        }
    }
}

// Define some convenience methods
impl EntityFilter {
    pub fn new_equal(
        attribute_name: impl Into<Attribute>,
        attribute_value: impl Into<Value>,
    ) -> Self {
        EntityFilter::Equal(attribute_name.into(), attribute_value.into())
    }

    pub fn new_in(
        attribute_name: impl Into<Attribute>,
        attribute_values: Vec<impl Into<Value>>,
    ) -> Self {
        EntityFilter::In(
            attribute_name.into(),
            attribute_values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn and_maybe(self, other: Option<Self>) -> Self {
        use EntityFilter as f;
        match other {
            Some(other) => match (self, other) {
                (f::And(mut fs1), f::And(mut fs2)) => {
                    fs1.append(&mut fs2);
                    f::And(fs1)
                }
                (f::And(mut fs1), f2) => {
                    fs1.push(f2);
                    f::And(fs1)
                }
                (f1, f::And(mut fs2)) => {
                    fs2.push(f1);
                    f::And(fs2)
                }
                (f1, f2) => f::And(vec![f1, f2]),
            },
            None => self,
        }
    }

    /// Check whether `entity` passes this filter. A missing attribute is
    /// treated like `null`.
    pub fn matches(&self, entity: &Entity) -> bool {
        use EntityFilter::*;

        let attr = |a: &str| entity.get(a).unwrap_or(&Value::Null);

        match self {
            And(fs) => fs.iter().all(|f| f.matches(entity)),
            Or(fs) => fs.iter().any(|f| f.matches(entity)),
            Equal(a, v) => values_equal(attr(a), v),
            Not(a, v) => !values_equal(attr(a), v),
            GreaterThan(a, v) => compare_values(attr(a), v) == Some(Ordering::Greater),
            LessThan(a, v) => compare_values(attr(a), v) == Some(Ordering::Less),
            In(a, vs) => vs.iter().any(|v| values_equal(attr(a), v)),
            Contains(a, v) => match (attr(a), v) {
                (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
                (Value::List(items), v) => items.iter().any(|item| values_equal(item, v)),
                _ => false,
            },
            ContainsNoCase(a, v) => match (attr(a), v) {
                (Value::String(s), Value::String(needle)) => {
                    s.to_lowercase().contains(&needle.to_lowercase())
                }
                (Value::List(items), Value::String(needle)) => {
                    let needle = needle.to_lowercase();
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|item| item.to_lowercase() == needle)
                }
                _ => false,
            },
            StartsWith(a, v) => match (attr(a), v) {
                (Value::String(s), Value::String(prefix)) => s.starts_with(prefix.as_str()),
                _ => false,
            },
            StartsWithNoCase(a, v) => match (attr(a), v) {
                (Value::String(s), Value::String(prefix)) => {
                    s.to_lowercase().starts_with(&prefix.to_lowercase())
                }
                _ => false,
            },
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(a), Value::BigInt(b)) | (Value::BigInt(b), Value::Int(a)) => {
            &BigInt::from(*a) == b
        }
        (a, b) => a == b,
    }
}

/// Compare two values of the same type. Values of different types, lists
/// and nulls are not comparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::BigInt(b)) => Some(BigInt::from(*a).cmp(b)),
        (Value::BigInt(a), Value::Int(b)) => Some(a.cmp(&BigInt::from(*b))),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// The order in which entities should be restored from a store.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityOrder {
    /// Order ascending by the given attribute. Use `id` as a tie-breaker
    Ascending(Attribute),
    /// Order descending by the given attribute. Use `id` as a tie-breaker
    Descending(Attribute),
    /// Order by the `id` of the entities
    Default,
}

impl EntityOrder {
    fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        fn by(attr: &str, a: &Entity, b: &Entity) -> Ordering {
            let a = a.get(attr).filter(|v| !v.is_null());
            let b = b.get(attr).filter(|v| !v.is_null());
            match (a, b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
            }
        }

        match self {
            EntityOrder::Ascending(attr) => by(attr, a, b).then_with(|| by(ID, a, b)),
            EntityOrder::Descending(attr) => by(attr, b, a).then_with(|| by(ID, b, a)),
            EntityOrder::Default => by(ID, a, b),
        }
    }
}

/// How many entities to return, how many to skip etc.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityRange {
    /// Limit on how many entities to return. When not set,
    /// `LINKFOLIO_QUERY_DEFAULT_FIRST` applies.
    pub first: Option<u32>,

    /// How many entities to skip.
    pub skip: u32,
}

impl EntityRange {
    /// Query for the first `n` entities.
    pub fn first(n: u32) -> Self {
        Self {
            first: Some(n),
            skip: 0,
        }
    }
}

/// A query for entities in a store.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityQuery {
    /// The type of the entities to look for
    pub entity_type: EntityType,

    /// Filter to filter entities by.
    pub filter: Option<EntityFilter>,

    /// How to order the entities
    pub order: EntityOrder,

    /// A range to limit the size of the result.
    pub range: EntityRange,
}

impl EntityQuery {
    pub fn new(entity_type: EntityType) -> Self {
        EntityQuery {
            entity_type,
            filter: None,
            order: EntityOrder::Default,
            range: EntityRange::default(),
        }
    }

    pub fn filter(mut self, filter: EntityFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: EntityOrder) -> Self {
        self.order = order;
        self
    }

    pub fn range(mut self, range: EntityRange) -> Self {
        self.range = range;
        self
    }

    pub fn first(mut self, first: u32) -> Self {
        self.range.first = Some(first);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.range.skip = skip;
        self
    }

    /// Apply this query to all entities of its type. Stores that keep their
    /// entities in a map hand them all to this method after loading.
    pub fn select(
        &self,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Result<Vec<Entity>, StoreError> {
        let first = self.range.first.unwrap_or(ENV_VARS.query_default_first);
        if first > ENV_VARS.query_max_first {
            return Err(StoreError::QueryExecutionError(format!(
                "The value of `first` must be between 0 and {}, but is {}",
                ENV_VARS.query_max_first, first
            )));
        }

        let mut entities: Vec<Entity> = entities
            .into_iter()
            .filter(|entity| {
                self.filter
                    .as_ref()
                    .map(|filter| filter.matches(entity))
                    .unwrap_or(true)
            })
            .collect();
        entities.sort_by(|a, b| self.order.compare(a, b));

        Ok(entities
            .into_iter()
            .skip(self.range.skip as usize)
            .take(first as usize)
            .collect())
    }
}

impl fmt::Display for EntityQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.entity_type)?;
        if let Some(filter) = &self.filter {
            write!(f, " where {}", filter)?;
        }
        match &self.order {
            EntityOrder::Ascending(attr) => write!(f, " order by {} asc", attr)?,
            EntityOrder::Descending(attr) => write!(f, " order by {} desc", attr)?,
            EntityOrder::Default => {}
        }
        if let Some(first) = self.range.first {
            write!(f, " first {}", first)?;
        }
        if self.range.skip > 0 {
            write!(f, " skip {}", self.range.skip)?;
        }
        Ok(())
    }
}
