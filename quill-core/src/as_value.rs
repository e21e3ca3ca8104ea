use crate::{Error, Result, Value};
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::{any, borrow::Cow};
use time::{Date, PrimitiveDateTime, Time, format_description::well_known::Iso8601};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// Entities use it in [`crate::Entity::get_value`] and [`crate::Entity::set_value`], so a
/// property can be bound as a parameter and written back from a result row.
///
/// `try_from_value` accepts the canonical variant for the type and, where it is lossless,
/// the variants drivers commonly return instead (for example `Int64` for an `i32` column
/// or `Varchar` for a UUID stored as text). Range is always checked.
///
/// ```rust
/// use quill_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int32(42));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(value.into())
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                $destination(self as _)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let wide = match value {
                    Value::Int32(v) => v as i64,
                    Value::Int64(v) => v,
                    Value::Boolean(v) => v as i64,
                    Value::Decimal(v) if v.is_integer() => v
                        .to_i64()
                        .ok_or_else(|| Error::msg(format!("Value {v}: Decimal does not fit into i64")))?,
                    Value::Varchar(ref v) => v.trim().parse::<i64>().map_err(|e| {
                        Error::new(e).context(format!(
                            "Cannot parse `{v}` as {}",
                            any::type_name::<Self>()
                        ))
                    })?,
                    ref v => return Err(mismatch::<Self>(v)),
                };
                <$source>::try_from(wide).map_err(|_| {
                    Error::msg(format!(
                        "Value {wide} is out of range for {}",
                        any::type_name::<Self>(),
                    ))
                })
            }
        }
    };
}
impl_as_value_integer!(i8, Value::Int32);
impl_as_value_integer!(i16, Value::Int32);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::Int32);
impl_as_value_integer!(u16, Value::Int32);
impl_as_value_integer!(u32, Value::Int64);

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int32(v) => Ok(v != 0),
            Value::Int64(v) => Ok(v != 0),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}

impl AsValue for f64 {
    fn as_value(self) -> Value {
        Value::Float64(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(v) => Ok(v),
            Value::Int32(v) => Ok(v as f64),
            Value::Int64(v) => Ok(v as f64),
            Value::Decimal(v) => v
                .to_f64()
                .ok_or_else(|| Error::msg(format!("Value {v}: Decimal does not fit into f64"))),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int32(v) => Ok(v.into()),
            Value::Int64(v) => Ok(v.into()),
            Value::Float64(v) => Decimal::from_f64(v)
                .ok_or_else(|| Error::msg(format!("Value {v}: f64 does not fit into Decimal"))),
            Value::Varchar(ref v) => v
                .parse()
                .map_err(|e| Error::new(e).context(format!("Cannot parse `{v}` as Decimal"))),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Uuid(v) => Ok(v.to_string()),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}

impl AsValue for Cow<'static, str> {
    fn as_value(self) -> Value {
        Value::Varchar(self.into_owned())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Box<[u8]> {
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}

impl AsValue for Uuid {
    fn as_value(self) -> Value {
        Value::Uuid(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::Varchar(ref v) => Uuid::parse_str(v)
                .map_err(|e| Error::new(e).context(format!("Cannot parse `{v}` as Uuid"))),
            Value::Blob(ref v) => Uuid::from_slice(v).map_err(Error::new),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}

macro_rules! impl_as_value_temporal {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                $destination(self)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(v) => Ok(v),
                    Value::Varchar(ref v) => <$source>::parse(v, &Iso8601::DEFAULT).map_err(|e| {
                        Error::new(e).context(format!(
                            "Cannot parse `{v}` as {}",
                            any::type_name::<Self>()
                        ))
                    }),
                    ref v => Err(mismatch::<Self>(v)),
                }
            }
        }
    };
}
impl_as_value_temporal!(Date, Value::Date);
impl_as_value_temporal!(Time, Value::Time);
impl_as_value_temporal!(PrimitiveDateTime, Value::Timestamp);

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::try_from_value(v).map(Some),
        }
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(self) -> Value {
        Value::List(self.into_iter().map(AsValue::as_value).collect())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(v) => v.into_iter().map(T::try_from_value).collect(),
            ref v => Err(mismatch::<Self>(v)),
        }
    }
}
