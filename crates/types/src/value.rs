//! Contract values and their JSON wire form.
//!
//! Types JSON cannot carry natively travel as single-key marker objects:
//!
//! | value                  | wire form                                         |
//! |------------------------|---------------------------------------------------|
//! | decimal                | `{"__fixed__": "1.5"}`                            |
//! | integer beyond i64     | `{"__big_int__": "123..."}`                       |
//! | datetime               | `{"__time__": [y, m, d, h, mi, s, us]}`           |
//! | timedelta              | `{"__delta__": [days, seconds]}`                  |

use crate::decimal::ContractingDecimal;
use crate::error::DecodeError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_json::{json, Map, Number, Value};
use std::fmt;
use std::str::FromStr;

pub const FIXED_MARKER: &str = "__fixed__";
pub const BIG_INT_MARKER: &str = "__big_int__";
pub const TIME_MARKER: &str = "__time__";
pub const DELTA_MARKER: &str = "__delta__";

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Declared type of a contract argument or stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Str,
    Int,
    Float,
    Bool,
    Dict,
    List,
    Any,
    DateTime,
    TimeDelta,
}

impl ValueType {
    /// Maps a contract annotation (`str`, `datetime.datetime`, ...) to a type.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(ValueType::Str),
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "bool" => Some(ValueType::Bool),
            "dict" => Some(ValueType::Dict),
            "list" => Some(ValueType::List),
            "Any" => Some(ValueType::Any),
            "datetime.datetime" | "datetime" => Some(ValueType::DateTime),
            "datetime.timedelta" | "timedelta" => Some(ValueType::TimeDelta),
            _ => None,
        }
    }

    /// Name used by the contract runtime in type errors
    pub fn python_name(&self) -> &'static str {
        match self {
            ValueType::Str => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Dict => "dict",
            ValueType::List => "list",
            ValueType::Any => "Any",
            ValueType::DateTime => "datetime",
            ValueType::TimeDelta => "timedelta",
        }
    }

    /// Name used when a stored value fails its type check. The contract
    /// runtime wraps temporal values in its own `DateTime` and `TimeDelta`.
    pub fn checked_name(&self) -> &'static str {
        match self {
            ValueType::DateTime => "DateTime",
            ValueType::TimeDelta => "TimeDelta",
            other => other.python_name(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.python_name())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_type_name(s).ok_or_else(|| format!("Unknown value type: {}", s))
    }
}

/// A value as seen by a contract
#[derive(Debug, Clone, PartialEq)]
pub enum ContractValue {
    Null,
    Str(String),
    Int(BigInt),
    Fixed(ContractingDecimal),
    Bool(bool),
    Dict(IndexMap<String, ContractValue>),
    List(Vec<ContractValue>),
    /// Microsecond precision. Build through [`ContractValue::datetime`] or `From`.
    DateTime(NaiveDateTime),
    /// Microsecond precision. Build through [`ContractValue::timedelta`] or `From`.
    TimeDelta(Duration),
}

impl ContractValue {
    /// Wraps a datetime, dropping anything finer than a microsecond.
    pub fn datetime(value: NaiveDateTime) -> Self {
        let nanos = value.nanosecond();
        ContractValue::DateTime(value.with_nanosecond(nanos - nanos % 1_000).unwrap_or(value))
    }

    /// Wraps a duration, truncating toward zero to whole microseconds.
    pub fn timedelta(value: Duration) -> Self {
        let excess = Duration::nanoseconds(i64::from(value.subsec_nanos() % 1_000));
        ContractValue::TimeDelta(value.checked_sub(&excess).unwrap_or(value))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            ContractValue::Null => ValueType::Any,
            ContractValue::Str(_) => ValueType::Str,
            ContractValue::Int(_) => ValueType::Int,
            ContractValue::Fixed(_) => ValueType::Float,
            ContractValue::Bool(_) => ValueType::Bool,
            ContractValue::Dict(_) => ValueType::Dict,
            ContractValue::List(_) => ValueType::List,
            ContractValue::DateTime(_) => ValueType::DateTime,
            ContractValue::TimeDelta(_) => ValueType::TimeDelta,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContractValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<ContractingDecimal> {
        match self {
            ContractValue::Fixed(d) => Some(d.clone()),
            ContractValue::Int(i) => Some(ContractingDecimal::from_bigint(i.clone())),
            _ => None,
        }
    }

    /// Encodes the value into its JSON wire form.
    pub fn to_wire(&self) -> Value {
        match self {
            ContractValue::Null => Value::Null,
            ContractValue::Str(s) => Value::String(s.clone()),
            ContractValue::Int(i) => int_to_wire(i),
            ContractValue::Fixed(d) => json!({ FIXED_MARKER: d.to_string() }),
            ContractValue::Bool(b) => Value::Bool(*b),
            ContractValue::Dict(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect::<Map<String, Value>>(),
            ),
            ContractValue::List(items) => Value::Array(items.iter().map(|v| v.to_wire()).collect()),
            ContractValue::DateTime(dt) => json!({
                TIME_MARKER: [
                    dt.year(),
                    dt.month(),
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second(),
                    dt.nanosecond() / 1_000,
                ]
            }),
            ContractValue::TimeDelta(delta) => {
                let (days, micros) = split_delta(delta);
                let seconds = if micros % MICROS_PER_SECOND == 0 {
                    json!(micros / MICROS_PER_SECOND)
                } else {
                    json!(micros as f64 / MICROS_PER_SECOND as f64)
                };
                json!({ DELTA_MARKER: [days, seconds] })
            }
        }
    }

    /// Decodes a JSON wire value.
    pub fn from_wire(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(ContractValue::Null),
            Value::Bool(b) => Ok(ContractValue::Bool(*b)),
            Value::Number(n) => Ok(number_to_value(n)?),
            Value::String(s) => Ok(ContractValue::Str(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(ContractValue::from_wire)
                .collect::<Result<Vec<_>, _>>()
                .map(ContractValue::List),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some((key, payload)) = map.iter().next() {
                        match key.as_str() {
                            FIXED_MARKER => return decode_fixed(payload),
                            BIG_INT_MARKER => return decode_big_int(payload),
                            TIME_MARKER => return decode_time(payload),
                            DELTA_MARKER => return decode_delta(payload),
                            _ => {}
                        }
                    }
                }
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), ContractValue::from_wire(v)?)))
                    .collect::<Result<IndexMap<_, _>, DecodeError>>()
                    .map(ContractValue::Dict)
            }
        }
    }
}

impl fmt::Display for ContractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractValue::Str(s) => f.write_str(s),
            ContractValue::Int(i) => write!(f, "{}", i),
            ContractValue::Fixed(d) => write!(f, "{}", d),
            other => write!(f, "{}", other.to_wire()),
        }
    }
}

impl From<&str> for ContractValue {
    fn from(value: &str) -> Self {
        ContractValue::Str(value.to_string())
    }
}

impl From<String> for ContractValue {
    fn from(value: String) -> Self {
        ContractValue::Str(value)
    }
}

impl From<i64> for ContractValue {
    fn from(value: i64) -> Self {
        ContractValue::Int(BigInt::from(value))
    }
}

impl From<bool> for ContractValue {
    fn from(value: bool) -> Self {
        ContractValue::Bool(value)
    }
}

impl From<ContractingDecimal> for ContractValue {
    fn from(value: ContractingDecimal) -> Self {
        ContractValue::Fixed(value)
    }
}

impl From<NaiveDateTime> for ContractValue {
    fn from(value: NaiveDateTime) -> Self {
        ContractValue::datetime(value)
    }
}

impl From<Duration> for ContractValue {
    fn from(value: Duration) -> Self {
        ContractValue::timedelta(value)
    }
}

pub(crate) fn int_to_wire(value: &BigInt) -> Value {
    if let Some(i) = value.to_i64() {
        Value::Number(i.into())
    } else {
        json!({ BIG_INT_MARKER: value.to_string() })
    }
}

/// Splits a duration into whole days and a non-negative microsecond remainder,
/// the way `datetime.timedelta` normalizes itself.
fn split_delta(delta: &Duration) -> (i64, i64) {
    let micros = i128::from(delta.num_seconds()) * i128::from(MICROS_PER_SECOND)
        + i128::from(delta.subsec_nanos() / 1_000);
    let per_day = i128::from(MICROS_PER_DAY);
    // |delta| is bounded by i64::MAX milliseconds, so whole days fit in i64
    let days = i64::try_from(micros.div_euclid(per_day)).unwrap_or(i64::MAX);
    (days, micros.rem_euclid(per_day) as i64)
}

fn number_to_value(n: &Number) -> Result<ContractValue, DecodeError> {
    if let Some(i) = n.as_i64() {
        return Ok(ContractValue::Int(BigInt::from(i)));
    }
    if let Some(u) = n.as_u64() {
        return Ok(ContractValue::Int(BigInt::from(u)));
    }
    let f = n
        .as_f64()
        .ok_or_else(|| DecodeError::InvalidDecimal(n.to_string()))?;
    Ok(ContractValue::Fixed(ContractingDecimal::from_f64(f)?))
}

fn marker_error(marker: &'static str, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidMarker {
        marker,
        reason: reason.into(),
    }
}

fn decode_fixed(payload: &Value) -> Result<ContractValue, DecodeError> {
    let decimal = match payload {
        Value::String(s) => s.parse()?,
        Value::Number(n) => ContractingDecimal::from_f64(
            n.as_f64()
                .ok_or_else(|| marker_error(FIXED_MARKER, n.to_string()))?,
        )?,
        other => return Err(marker_error(FIXED_MARKER, format!("expected string, got {}", other))),
    };
    Ok(ContractValue::Fixed(decimal))
}

fn decode_big_int(payload: &Value) -> Result<ContractValue, DecodeError> {
    let text = match payload {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(marker_error(BIG_INT_MARKER, format!("expected string, got {}", other))),
    };
    BigInt::from_str(text.trim())
        .map(ContractValue::Int)
        .map_err(|e| marker_error(BIG_INT_MARKER, e.to_string()))
}

fn decode_time(payload: &Value) -> Result<ContractValue, DecodeError> {
    let parts = payload
        .as_array()
        .ok_or_else(|| marker_error(TIME_MARKER, "expected an array"))?;
    if parts.len() < 3 || parts.len() > 7 {
        return Err(marker_error(TIME_MARKER, format!("expected 3 to 7 fields, got {}", parts.len())));
    }
    let mut fields = [0i64; 7];
    for (slot, part) in fields.iter_mut().zip(parts) {
        *slot = part
            .as_i64()
            .ok_or_else(|| marker_error(TIME_MARKER, format!("non-integer field {}", part)))?;
    }
    let [year, month, day, hour, minute, second, micro] = fields;

    let to_u32 = |v: i64| {
        u32::try_from(v).map_err(|_| marker_error(TIME_MARKER, format!("field out of range: {}", v)))
    };
    let year = i32::try_from(year).map_err(|_| marker_error(TIME_MARKER, "year out of range"))?;
    let (month, day) = (to_u32(month)?, to_u32(day)?);
    let (hour, minute, second, micro) = (to_u32(hour)?, to_u32(minute)?, to_u32(second)?, to_u32(micro)?);

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_micro_opt(hour, minute, second, micro))
        .map(ContractValue::DateTime)
        .ok_or_else(|| marker_error(TIME_MARKER, format!("invalid date {}", payload)))
}

fn decode_delta(payload: &Value) -> Result<ContractValue, DecodeError> {
    let parts = payload
        .as_array()
        .filter(|parts| parts.len() == 2)
        .ok_or_else(|| marker_error(DELTA_MARKER, "expected [days, seconds]"))?;
    let days = parts[0]
        .as_i64()
        .ok_or_else(|| marker_error(DELTA_MARKER, format!("non-integer days {}", parts[0])))?;
    let seconds = parts[1]
        .as_f64()
        .ok_or_else(|| marker_error(DELTA_MARKER, format!("non-numeric seconds {}", parts[1])))?;
    let micros = match parts[1].as_i64() {
        Some(s) => i128::from(s) * i128::from(MICROS_PER_SECOND),
        None => (seconds * MICROS_PER_SECOND as f64).round() as i128,
    };

    let out_of_range = || marker_error(DELTA_MARKER, format!("duration out of range {}", payload));
    let total = (i128::from(days) * i128::from(MICROS_PER_DAY))
        .checked_add(micros)
        .ok_or_else(out_of_range)?;
    let whole_seconds = i64::try_from(total.div_euclid(i128::from(MICROS_PER_SECOND)))
        .map_err(|_| out_of_range())?;
    let sub_micros = total.rem_euclid(i128::from(MICROS_PER_SECOND)) as i64;

    Duration::new(whole_seconds, sub_micros as u32 * 1_000)
        .map(ContractValue::TimeDelta)
        .ok_or_else(out_of_range)
}
