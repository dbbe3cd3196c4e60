use crate::{Error, Result, truncate_long};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{
    any,
    fmt::{self, Display},
    str::FromStr,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed value used for query parameters and result cells.
///
/// Every variant but `Null` carries an `Option`: `None` is a typed NULL, which
/// drivers may use to pick the right wire type.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// Returns `true` for integers, floats and decimals. Strings are not inspected.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int64(Some(..))
                | Value::UInt64(Some(..))
                | Value::Float32(Some(..))
                | Value::Float64(Some(..))
                | Value::Decimal(Some(..))
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(Some(v)) => Some(v),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        match self {
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::UInt64(Some(v)) => write!(f, "{v}"),
            Value::Float32(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Decimal(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) => f.write_str(v),
            Value::Blob(Some(v)) => {
                for b in v.iter() {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Value::Date(Some(v)) => write!(f, "{v}"),
            Value::Time(Some(v)) => write!(f, "{v}"),
            Value::Timestamp(Some(v)) => write!(f, "{v}"),
            Value::TimestampWithTimezone(Some(v)) => write!(f, "{v}"),
            Value::Uuid(Some(v)) => write!(f, "{v}"),
            _ => f.write_str("NULL"),
        }
    }
}

/// Conversion between native Rust types and [`Value`].
///
/// `try_from_value` accepts the canonical variant for the type and, where it
/// is lossless, the other numeric widths and textual forms a driver may hand
/// back (MySQL reports `TINYINT(1)` as an integer and `DECIMAL` as text, for
/// example).
pub trait AsValue {
    /// The typed NULL for this type.
    fn as_empty_value() -> Value;
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

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Varchar(Some(value.clone()))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert `{:?}` into {}",
        value,
        any::type_name::<T>()
    ))
}

fn parse_text<T: FromStr>(value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse::<T>().map_err(|e| {
        Error::new(e).context(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(value),
            any::type_name::<T>()
        ))
    })
}

macro_rules! impl_as_value_integer {
    ($($source:ty),+ $(,)?) => {
        $(
            impl AsValue for $source {
                fn as_empty_value() -> Value {
                    Value::Int64(None)
                }
                fn as_value(self) -> Value {
                    Value::Int64(Some(self as _))
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    let converted: Option<Self> = match &value {
                        Value::Int64(Some(v)) => (*v).try_into().ok(),
                        Value::UInt64(Some(v)) => (*v).try_into().ok(),
                        Value::Boolean(Some(v)) => Some(*v as _),
                        Value::Decimal(Some(v)) if v.fract().is_zero() => v.to_i128().and_then(|v| v.try_into().ok()),
                        Value::Varchar(Some(v)) => Some(parse_text::<Self>(v)?),
                        _ => None,
                    };
                    converted.ok_or_else(|| mismatch::<Self>(&value))
                }
            }
        )+
    };
}

impl_as_value_integer!(i8, i16, i32, i64, u8, u16, u32);

impl AsValue for u64 {
    fn as_empty_value() -> Value {
        Value::UInt64(None)
    }
    fn as_value(self) -> Value {
        Value::UInt64(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::UInt64(Some(v)) => Some(*v),
            Value::Int64(Some(v)) => (*v).try_into().ok(),
            Value::Decimal(Some(v)) if v.fract().is_zero() => v.to_u64(),
            Value::Varchar(Some(v)) => Some(parse_text::<u64>(v)?),
            _ => None,
        };
        converted.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(Some(v)) => Ok(*v),
            Value::Int64(Some(v)) => Ok(*v != 0),
            Value::UInt64(Some(v)) => Ok(*v != 0),
            Value::Varchar(Some(v)) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
                "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
                _ => Err(mismatch::<Self>(&value)),
            },
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

macro_rules! impl_as_value_float {
    ($source:ty, $variant:path, $to_decimal:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted: Option<Self> = match &value {
                    Value::Float32(Some(v)) => Some(*v as _),
                    Value::Float64(Some(v)) => Some(*v as _),
                    Value::Int64(Some(v)) => Some(*v as _),
                    Value::UInt64(Some(v)) => Some(*v as _),
                    Value::Decimal(Some(v)) => $to_decimal(v),
                    Value::Varchar(Some(v)) => Some(parse_text::<Self>(v)?),
                    _ => None,
                };
                converted.ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    };
}

impl_as_value_float!(f32, Value::Float32, ToPrimitive::to_f32);
impl_as_value_float!(f64, Value::Float64, ToPrimitive::to_f64);

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Decimal(Some(v)) => Some(*v),
            Value::Int64(Some(v)) => Some(Decimal::from(*v)),
            Value::UInt64(Some(v)) => Some(Decimal::from(*v)),
            Value::Float32(Some(v)) => Decimal::from_f32(*v),
            Value::Float64(Some(v)) => Decimal::from_f64(*v),
            Value::Varchar(Some(v)) => Some(parse_text::<Decimal>(v)?),
            _ => None,
        };
        converted.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::new(e).context("The blob is not valid UTF-8")),
            v if !v.is_null() => Ok(v.to_string()),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            Value::Varchar(Some(v)) => Ok(v.into_bytes()),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

macro_rules! impl_as_value_native {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $variant(Some(v)) => Ok(v),
                    v => Err(mismatch::<Self>(&v)),
                }
            }
        }
    };
}

impl_as_value_native!(Date, Value::Date);
impl_as_value_native!(Time, Value::Time);
impl_as_value_native!(PrimitiveDateTime, Value::Timestamp);
impl_as_value_native!(OffsetDateTime, Value::TimestampWithTimezone);

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Uuid::parse_str(v.trim()).map_err(Into::into),
            Value::Blob(Some(v)) => Uuid::from_slice(&v).map_err(Into::into),
            v => Err(mismatch::<Self>(&v)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
