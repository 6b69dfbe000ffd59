use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

pub type Fields = BTreeMap<String, Value>;

/// A typed field value, mirroring the kinds a Firestore document can hold
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Map(Fields),
}

impl Value {
    /// Kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    // Cross-kind ordering follows Firestore: null, booleans, numbers,
    // timestamps, strings, arrays, maps.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Double(_) => 2,
            Value::Timestamp(_) => 3,
            Value::String(_) => 4,
            Value::Array(_) => 5,
            Value::Map(_) => 6,
        }
    }

    /// Total order used when sorting query results
    pub fn order_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Integer(a), Value::Double(b)) => (*a as f64).total_cmp(b),
            (Value::Double(a), Value::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.order_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Map(a), Value::Map(b)) => a.len().cmp(&b.len()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(instant: DateTime<Utc>) -> Self {
        Value::Timestamp(instant)
    }
}

/// A field could not be read as the kind a record requires
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("missing required field '{0}'")]
    Missing(String),

    #[error("field '{field}' should be {expected}, found {found}")]
    WrongKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A stored document: its store-generated id plus raw fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Required string field
    pub fn string(&self, field: &str) -> Result<String, FieldError> {
        self.optional_string(field)?
            .ok_or_else(|| FieldError::Missing(field.to_string()))
    }

    /// Optional string field; explicit nulls count as absent
    pub fn optional_string(&self, field: &str) -> Result<Option<String>, FieldError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(FieldError::WrongKind {
                field: field.to_string(),
                expected: "string",
                found: other.kind(),
            }),
        }
    }

    /// Array of strings; absent means empty
    pub fn string_array(&self, field: &str) -> Result<Vec<String>, FieldError> {
        let items = match self.get(field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(FieldError::WrongKind {
                    field: field.to_string(),
                    expected: "array",
                    found: other.kind(),
                });
            }
        };

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| FieldError::WrongKind {
                        field: field.to_string(),
                        expected: "array of strings",
                        found: item.kind(),
                    })
            })
            .collect()
    }
}

/// Sort direction for [`Query::order_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// The query shapes the site needs: one equality filter, one sort key and
/// a result limit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
