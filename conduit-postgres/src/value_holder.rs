use bytes::{BufMut, BytesMut};
use conduit_core::{AsValue, Value};
use postgres_types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use rust_decimal::Decimal;
use std::{error::Error, io::Read};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Version byte leading the binary form of `jsonb`.
const JSONB_VERSION: u8 = 1;

#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl From<Value> for ValueHolder {
    fn from(value: Value) -> Self {
        ValueHolder(value)
    }
}

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, Some(raw))
    }
    fn from_sql_null(ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, None)
    }
    fn from_sql_nullable(
        ty: &Type,
        raw: Option<&'a [u8]>,
    ) -> Result<Self, Box<dyn Error + Sync + Send>> {
        macro_rules! to_value {
            ($ty_var:ident, $raw:ident, $($($ty:path)|+ => ($value:path, $source:ty),)+) => {
                match *$ty_var {
                    $($($ty)|+ => $value(if let Some($raw) = $raw { Some(<$source>::from_sql($ty_var, $raw)?.into()) } else { None }),)+
                    Type::JSONB => Value::Varchar(match $raw {
                        Some([JSONB_VERSION, json @ ..]) => Some(String::from_utf8(json.to_vec())?),
                        Some(..) => return Err(conduit_core::Error::msg("Unsupported jsonb version").into()),
                        None => None,
                    }),
                    _ => {
                        if let Some(mut raw) = $raw {
                            let mut buf = String::new();
                            let _ = raw.read_to_string(&mut buf);
                            return Err(conduit_core::Error::msg(format!("Cannot decode sql type: `{}`, value: `{}`", $ty_var, buf)).into());
                        }
                        Value::Null
                    }
                }
            };
        }
        let value = to_value!(ty, raw,
            Type::BOOL => (Value::Boolean, bool),
            Type::CHAR => (Value::Int64, i8),
            Type::INT2 => (Value::Int64, i16),
            Type::INT4 => (Value::Int64, i32),
            Type::INT8 => (Value::Int64, i64),
            Type::OID => (Value::Int64, u32),
            Type::FLOAT4 => (Value::Float32, f32),
            Type::FLOAT8 => (Value::Float64, f64),
            Type::NUMERIC => (Value::Decimal, Decimal),
            Type::VARCHAR
            | Type::TEXT
            | Type::NAME
            | Type::BPCHAR
            | Type::JSON
            | Type::XML
            | Type::UNKNOWN => (Value::Varchar, String),
            Type::BYTEA => (Value::Blob, Vec<u8>),
            Type::DATE => (Value::Date, Date),
            Type::TIME => (Value::Time, Time),
            Type::TIMESTAMP => (Value::Timestamp, PrimitiveDateTime),
            Type::TIMESTAMPTZ => (Value::TimestampWithTimezone, OffsetDateTime),
            Type::UUID => (Value::Uuid, Uuid),
        );
        Ok(value.into())
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn is_text(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::VARCHAR | Type::TEXT | Type::NAME | Type::BPCHAR | Type::XML | Type::UNKNOWN
    )
}

/// Text forms accepted for temporal parameters.
fn parse_temporal(ty: &Type, text: &str) -> conduit_core::Result<Value> {
    let text = text.trim();
    Ok(match *ty {
        Type::DATE => Value::Date(Some(Date::parse(
            text,
            format_description!("[year]-[month]-[day]"),
        )?)),
        Type::TIME => Value::Time(Some(Time::parse(
            text,
            format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]"),
        )?)),
        Type::TIMESTAMP => Value::Timestamp(Some(PrimitiveDateTime::parse(
            &text.replacen('T', " ", 1),
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
        )?)),
        Type::TIMESTAMPTZ => {
            Value::TimestampWithTimezone(Some(OffsetDateTime::parse(text, &Rfc3339)?))
        }
        _ => {
            return Err(conduit_core::Error::msg(format!(
                "`{ty}` is not a temporal type"
            )));
        }
    })
}

impl ToSql for ValueHolder {
    /// Encode the value as the type the server expects for the parameter,
    /// converting between numbers, text and booleans when needed.
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>>
    where
        Self: Sized,
    {
        let value = &self.0;
        if value.is_null() {
            return Ok(IsNull::Yes);
        }
        match *ty {
            Type::BOOL => bool::try_from_value(value.clone())?.to_sql(ty, out),
            Type::CHAR => i8::try_from_value(value.clone())?.to_sql(ty, out),
            Type::INT2 => i16::try_from_value(value.clone())?.to_sql(ty, out),
            Type::INT4 => i32::try_from_value(value.clone())?.to_sql(ty, out),
            Type::INT8 => i64::try_from_value(value.clone())?.to_sql(ty, out),
            Type::OID => u32::try_from_value(value.clone())?.to_sql(ty, out),
            Type::FLOAT4 => f32::try_from_value(value.clone())?.to_sql(ty, out),
            Type::FLOAT8 => f64::try_from_value(value.clone())?.to_sql(ty, out),
            Type::NUMERIC => Decimal::try_from_value(value.clone())?.to_sql(ty, out),
            Type::BYTEA => Vec::<u8>::try_from_value(value.clone())?
                .as_slice()
                .to_sql(ty, out),
            Type::UUID => Uuid::try_from_value(value.clone())?.to_sql(ty, out),
            Type::JSON => {
                out.put_slice(String::try_from_value(value.clone())?.as_bytes());
                Ok(IsNull::No)
            }
            Type::JSONB => {
                out.put_u8(JSONB_VERSION);
                out.put_slice(String::try_from_value(value.clone())?.as_bytes());
                Ok(IsNull::No)
            }
            Type::DATE | Type::TIME | Type::TIMESTAMP | Type::TIMESTAMPTZ => {
                let value = match value {
                    Value::Varchar(Some(v)) => parse_temporal(ty, v)?,
                    v => v.clone(),
                };
                match value {
                    Value::Date(Some(v)) if *ty == Type::DATE => v.to_sql(ty, out),
                    Value::Time(Some(v)) if *ty == Type::TIME => v.to_sql(ty, out),
                    Value::Timestamp(Some(v)) if *ty == Type::TIMESTAMP => v.to_sql(ty, out),
                    Value::Timestamp(Some(v)) if *ty == Type::TIMESTAMPTZ => {
                        v.assume_utc().to_sql(ty, out)
                    }
                    Value::TimestampWithTimezone(Some(v)) if *ty == Type::TIMESTAMPTZ => {
                        v.to_sql(ty, out)
                    }
                    Value::Date(Some(v)) if *ty == Type::TIMESTAMP => {
                        v.midnight().to_sql(ty, out)
                    }
                    v => Err(conduit_core::Error::msg(format!(
                        "Cannot bind `{v}` to a parameter of type `{ty}`"
                    ))
                    .into()),
                }
            }
            _ if is_text(ty) => String::try_from_value(value.clone())?.to_sql(ty, out),
            _ => Err(conduit_core::Error::msg(format!(
                "Cannot bind `{value}` to a parameter of type `{ty}`"
            ))
            .into()),
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_text() {
        assert_eq!(
            parse_temporal(&Type::DATE, "2024-02-29").unwrap(),
            Value::Date(Some(time::macros::date!(2024 - 02 - 29)))
        );
        assert_eq!(
            parse_temporal(&Type::TIMESTAMP, "2024-02-29 12:30:00").unwrap(),
            Value::Timestamp(Some(time::macros::datetime!(2024-02-29 12:30:00)))
        );
        assert_eq!(
            parse_temporal(&Type::TIMESTAMP, "2024-02-29T12:30:00.5").unwrap(),
            Value::Timestamp(Some(time::macros::datetime!(2024-02-29 12:30:00.5)))
        );
        assert!(parse_temporal(&Type::DATE, "yesterday").is_err());
        assert!(parse_temporal(&Type::INT4, "2024-02-29").is_err());
    }

    #[test]
    fn encode_as_target_type() {
        let mut out = BytesMut::new();
        let holder = ValueHolder(Value::Int64(Some(42)));
        assert!(matches!(holder.to_sql(&Type::INT2, &mut out), Ok(IsNull::No)));
        assert_eq!(&out[..], &42i16.to_be_bytes());

        out.clear();
        assert!(holder.to_sql(&Type::VARCHAR, &mut out).is_ok());
        assert_eq!(&out[..], b"42");

        out.clear();
        let holder = ValueHolder(Value::Int64(Some(100_000)));
        assert!(holder.to_sql(&Type::INT2, &mut out).is_err());

        out.clear();
        let holder = ValueHolder(Value::Varchar(None));
        assert!(matches!(holder.to_sql(&Type::INT4, &mut out), Ok(IsNull::Yes)));

        out.clear();
        let holder = ValueHolder(Value::Varchar(Some("{\"a\":1}".into())));
        assert!(holder.to_sql(&Type::JSONB, &mut out).is_ok());
        assert_eq!(&out[..], b"\x01{\"a\":1}");
    }
}
