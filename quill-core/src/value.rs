use crate::{Error, QueryError, Result};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::fmt::{self, Display};
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed value bound as a statement parameter or read from a result row.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Decimal(Decimal),
    Varchar(String),
    Blob(Box<[u8]>),
    Date(Date),
    Time(Time),
    Timestamp(PrimitiveDateTime),
    Uuid(Uuid),
    /// Ordered sequence of scalars, compiled into an `IN (...)` list by field predicates.
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(..))
    }

    /// Integer content of numeric variants, used to read identities and counts.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::Decimal(v) if v.is_integer() => v.to_i64(),
            Value::Float64(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::Varchar(v) => v.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Varchar(v) => write!(f, "'{v}'"),
            Value::Blob(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::List(v) => {
                f.write_str("[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Value of a key property, or of all the key properties when the key is composite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Int64(i64),
    Varchar(String),
    Uuid(Uuid),
    /// Property name and value of every key part.
    Composite(Vec<(String, KeyValue)>),
}

impl KeyValue {
    pub fn composite<N: Into<String>, K: Into<KeyValue>>(
        parts: impl IntoIterator<Item = (N, K)>,
    ) -> Self {
        KeyValue::Composite(
            parts
                .into_iter()
                .map(|(n, k)| (n.into(), k.into()))
                .collect(),
        )
    }

    /// Part of a composite key, a scalar key has no named parts.
    pub fn part(&self, property: &str) -> Option<&KeyValue> {
        match self {
            KeyValue::Composite(parts) => parts
                .iter()
                .find_map(|(n, v)| if n == property { Some(v) } else { None }),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, KeyValue::Composite(..))
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        KeyValue::Int64(value as i64)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Int64(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Varchar(value.to_owned())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::Varchar(value)
    }
}

impl From<Uuid> for KeyValue {
    fn from(value: Uuid) -> Self {
        KeyValue::Uuid(value)
    }
}

impl TryFrom<Value> for KeyValue {
    type Error = Error;
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Int32(v) => Ok(KeyValue::Int64(v as i64)),
            Value::Int64(v) => Ok(KeyValue::Int64(v)),
            Value::Varchar(v) => Ok(KeyValue::Varchar(v)),
            Value::Uuid(v) => Ok(KeyValue::Uuid(v)),
            v @ Value::Decimal(..) => v
                .as_i64()
                .map(KeyValue::Int64)
                .ok_or_else(|| Error::msg(format!("Decimal {v} cannot be used as a key"))),
            v => Err(Error::msg(format!("{v:?} cannot be used as a key"))),
        }
    }
}

impl TryFrom<KeyValue> for Value {
    type Error = Error;
    fn try_from(value: KeyValue) -> Result<Self> {
        match value {
            KeyValue::Int64(v) => Ok(Value::Int64(v)),
            KeyValue::Varchar(v) => Ok(Value::Varchar(v)),
            KeyValue::Uuid(v) => Ok(Value::Uuid(v)),
            KeyValue::Composite(..) => Err(QueryError::Unsupported(
                "A composite key cannot be converted into a single value".into(),
            )
            .into()),
        }
    }
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int64(v) => write!(f, "{v}"),
            KeyValue::Varchar(v) => write!(f, "{v}"),
            KeyValue::Uuid(v) => write!(f, "{v}"),
            KeyValue::Composite(parts) => {
                f.write_str("{")?;
                for (i, (name, value)) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
