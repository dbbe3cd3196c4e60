use conduit_core::{Error, Result, Value};
use mysql_async::{Column, consts::ColumnType};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::{Date, Month, PrimitiveDateTime, Time};

/// Character set number MySQL reports for binary columns.
const BINARY_CHARSET: u16 = 63;

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

/// Decode a cell of the binary protocol, the column decides how bytes are read.
pub(crate) fn decode_value(value: mysql_async::Value, column: &Column) -> Result<Value> {
    type MySQLValue = mysql_async::Value;
    Ok(match value {
        MySQLValue::NULL => Value::Null,
        MySQLValue::Bytes(v) => match column.column_type() {
            ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                let text = String::from_utf8(v)?;
                Value::Decimal(Some(Decimal::from_str(&text).map_err(|e| {
                    Error::new(e).context(format!("Cannot decode `{text}` as a decimal"))
                })?))
            }
            _ if column.character_set() == BINARY_CHARSET => Value::Blob(Some(v.into())),
            _ => Value::Varchar(Some(String::from_utf8(v).map_err(|e| {
                Error::new(e).context(format!(
                    "The column `{}` is not valid UTF-8",
                    column.name_str()
                ))
            })?)),
        },
        MySQLValue::Int(v) => Value::Int64(Some(v)),
        MySQLValue::UInt(v) => Value::UInt64(Some(v)),
        MySQLValue::Float(v) => Value::Float32(Some(v)),
        MySQLValue::Double(v) => Value::Float64(Some(v)),
        MySQLValue::Date(year, month, day, hour, minute, second, microsecond) => {
            let context = || {
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} is not a valid date")
            };
            let date = Month::try_from(month)
                .map_err(Error::new)
                .and_then(|month| {
                    Date::from_calendar_date(year as _, month, day).map_err(Error::new)
                })
                .map_err(|e| e.context(context()))?;
            if column.column_type() == ColumnType::MYSQL_TYPE_DATE {
                Value::Date(Some(date))
            } else {
                let time = Time::from_hms_micro(hour, minute, second, microsecond)
                    .map_err(|e| Error::new(e).context(context()))?;
                Value::Timestamp(Some(PrimitiveDateTime::new(date, time)))
            }
        }
        MySQLValue::Time(negative, days, hours, minutes, seconds, microseconds) => {
            if !negative && days == 0 {
                Value::Time(Some(
                    Time::from_hms_micro(hours, minutes, seconds, microseconds)
                        .map_err(Error::new)?,
                ))
            } else {
                // TIME columns span -838:59:59 to 838:59:59
                Value::Varchar(Some(format!(
                    "{}{:02}:{minutes:02}:{seconds:02}.{microseconds:06}",
                    if negative { "-" } else { "" },
                    days * 24 + hours as u32,
                )))
            }
        }
    })
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self> {
        type MySQLValue = mysql_async::Value;
        macro_rules! ensure_date_range {
            ($date:expr) => {{
                let year = $date.year();
                if (0..=9999).contains(&year) {
                    Ok(MySQLValue::Date(
                        year as _,
                        $date.month().into(),
                        $date.day(),
                        $date.hour(),
                        $date.minute(),
                        $date.second(),
                        $date.microsecond(),
                    ))
                } else {
                    Err(Error::msg(format!("Date {} is out of range for MySQL", $date)))
                }
            }};
        }
        Ok(match value.0 {
            _ if value.0.is_null() => MySQLValue::NULL,
            Value::Boolean(Some(v)) => MySQLValue::Int(v as _),
            Value::Int64(Some(v)) => MySQLValue::Int(v),
            Value::UInt64(Some(v)) => MySQLValue::UInt(v),
            Value::Float32(Some(v)) => MySQLValue::Float(v),
            Value::Float64(Some(v)) => MySQLValue::Double(v),
            Value::Decimal(Some(v)) => MySQLValue::from(v),
            Value::Varchar(Some(v)) => MySQLValue::Bytes(v.into_bytes()),
            Value::Blob(Some(v)) => MySQLValue::Bytes(v.into_vec()),
            Value::Date(Some(v)) => MySQLValue::from(v),
            Value::Time(Some(v)) => MySQLValue::from(v),
            Value::Timestamp(Some(v)) => ensure_date_range!(v)?,
            Value::TimestampWithTimezone(Some(v)) => {
                let date_time = v.to_utc();
                ensure_date_range!(date_time)?
            }
            Value::Uuid(Some(v)) => MySQLValue::Bytes(v.to_string().into_bytes()),
            _ => {
                return Err(Error::msg(format!(
                    "Value `{:?}` is not supported by MySQL",
                    value.0
                )));
            }
        })
    }
}
