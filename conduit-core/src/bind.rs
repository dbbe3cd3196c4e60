use crate::{ConnectorError, Error, Result, Value, consume_while, truncate_long};
use rust_decimal::prelude::ToPrimitive;
use std::fmt::{self, Display};

/// Semantic type attached to a parameter before it reaches the native client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindType {
    Null,
    Boolean,
    Integer,
    String,
}

impl BindType {
    /// Conventional numeric code of the tag, as printed by [`Connector::debug`](crate::Connector::debug).
    pub const fn code(&self) -> u8 {
        match self {
            BindType::Null => 0,
            BindType::Integer => 1,
            BindType::String => 2,
            BindType::Boolean => 5,
        }
    }
}

impl Display for BindType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindType::Null => "null",
            BindType::Boolean => "boolean",
            BindType::Integer => "integer",
            BindType::String => "string",
        })
    }
}

/// Classify a value, first match wins: null, boolean, numeric, string.
///
/// Floats, decimals and strings that read as a number are all tagged
/// [`BindType::Integer`]. Non-integral numbers lose their fractional part when
/// bound, see [`coerce`].
pub fn classify(value: &Value) -> BindType {
    match value {
        v if v.is_null() => BindType::Null,
        Value::Boolean(..) => BindType::Boolean,
        v if v.is_number() => BindType::Integer,
        Value::Varchar(Some(v)) if is_numeric(v) => BindType::Integer,
        _ => BindType::String,
    }
}

/// Whether the whole string reads as a decimal number.
///
/// Leading and trailing whitespace, a sign, a fractional part and an exponent
/// are accepted. Hexadecimal, `inf`, `nan` and the empty string are not.
pub fn is_numeric(value: &str) -> bool {
    let mut input = value.trim_matches(is_blank);
    if input.starts_with(['+', '-']) {
        input = &input[1..];
    }
    let integral = consume_while(&mut input, char::is_ascii_digit);
    let mut fractional = "";
    if let Some(rest) = input.strip_prefix('.') {
        input = rest;
        fractional = consume_while(&mut input, char::is_ascii_digit);
    }
    if integral.is_empty() && fractional.is_empty() {
        return false;
    }
    if let Some(rest) = input.strip_prefix(['e', 'E']) {
        input = rest;
        if input.starts_with(['+', '-']) {
            input = &input[1..];
        }
        if consume_while(&mut input, char::is_ascii_digit).is_empty() {
            return false;
        }
    }
    input.is_empty()
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn float_to_integer(value: f64) -> Result<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(Error::msg(format!("{value} is out of range for an integer")));
    }
    Ok(truncated as i64)
}

fn text_to_integer(value: &str) -> Result<i64> {
    let trimmed = value.trim_matches(is_blank);
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if let Ok(v) = unsigned.parse::<i64>() {
        return Ok(v);
    }
    let parsed = fast_float::parse::<f64, _>(unsigned).map_err(|_| {
        Error::msg(format!(
            "`{}` is not a number",
            truncate_long!(value)
        ))
    })?;
    float_to_integer(parsed)
}

/// Reshape `value` to the wire form implied by `bind_type`.
///
/// - `Integer`: every number and numeric string becomes `Int64`, truncated toward zero.
/// - `String`: text stays text, numbers and booleans are rendered, native values
///   (blobs, dates, uuids) are kept for the driver to encode.
/// - `Null` and `Boolean` pass through.
pub fn coerce(value: &Value, bind_type: BindType) -> Result<Value> {
    match bind_type {
        BindType::Null => Ok(Value::Null),
        BindType::Boolean => Ok(value.clone()),
        BindType::Integer => {
            let integer = match value {
                Value::Int64(Some(v)) => *v,
                Value::UInt64(Some(v)) => i64::try_from(*v)
                    .map_err(|_| Error::msg(format!("{v} is out of range for an integer")))?,
                Value::Float32(Some(v)) => float_to_integer(*v as f64)?,
                Value::Float64(Some(v)) => float_to_integer(*v)?,
                Value::Decimal(Some(v)) => v
                    .trunc()
                    .to_i64()
                    .ok_or_else(|| Error::msg(format!("{v} is out of range for an integer")))?,
                Value::Varchar(Some(v)) => text_to_integer(v)?,
                _ => {
                    return Err(Error::msg(format!(
                        "Value `{:?}` cannot be bound as an integer",
                        value
                    )));
                }
            };
            Ok(Value::Int64(Some(integer)))
        }
        BindType::String => Ok(match value {
            Value::Varchar(..)
            | Value::Blob(..)
            | Value::Date(..)
            | Value::Time(..)
            | Value::Timestamp(..)
            | Value::TimestampWithTimezone(..)
            | Value::Uuid(..) => value.clone(),
            v => Value::Varchar(Some(v.to_string())),
        }),
    }
}

/// A named parameter with the type inferred from its value.
///
/// The type is decided once, at construction, and cannot be overridden.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    name: String,
    value: Value,
    bind_type: BindType,
}

impl BoundParameter {
    /// The name may carry the `:` sigil, it is removed.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut name: String = name.into();
        if name.starts_with(':') {
            name.remove(0);
        }
        let value = value.into();
        let bind_type = classify(&value);
        Self {
            name,
            value,
            bind_type,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn value(&self) -> &Value {
        &self.value
    }
    pub fn bind_type(&self) -> BindType {
        self.bind_type
    }
    /// The value as it must be sent to the native client.
    pub fn coerced(&self) -> Result<Value> {
        coerce(&self.value, self.bind_type).map_err(|e| {
            e.context(ConnectorError::Bind {
                name: self.name.clone(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings() {
        for v in ["42", "-42", "+42", "3.14", ".5", "5.", "1e3", "1.5E-3", " 12 ", "\t7\n"] {
            assert!(is_numeric(v), "`{v}` should be numeric");
        }
        for v in ["", " ", "abc", "42abc", "0x1A", "inf", "NaN", "1e", ".", "-", "1 2", "1_000"] {
            assert!(!is_numeric(v), "`{v}` should not be numeric");
        }
    }

    #[test]
    fn text_integers() {
        assert_eq!(text_to_integer("42").unwrap(), 42);
        assert_eq!(text_to_integer(" +7 ").unwrap(), 7);
        assert_eq!(text_to_integer("-3.99").unwrap(), -3);
        assert_eq!(text_to_integer("1e3").unwrap(), 1000);
        assert_eq!(text_to_integer("9223372036854775807").unwrap(), i64::MAX);
        assert!(text_to_integer("1e300").is_err());
    }
}
