//! Argument encoder.
//!
//! Coerces loosely typed client input (a `serde_json::Value` as typed by a
//! user or read from a form) into the wire value a contract argument of the
//! given type expects.

use crate::contract::MethodArgument;
use crate::decimal::ContractingDecimal;
use crate::error::EncodeError;
use crate::value::{int_to_wire, ContractValue, FIXED_MARKER, BIG_INT_MARKER, DELTA_MARKER, TIME_MARKER};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Encoder type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingType {
    Str,
    Int,
    Float,
    Number,
    BigNumber,
    Bool,
    Dict,
    List,
    Object,
    Any,
    DateTime,
    TimeDelta,
}

impl EncodingType {
    fn name(&self) -> &'static str {
        match self {
            EncodingType::Str => "str",
            EncodingType::Int => "int",
            EncodingType::Float => "float",
            EncodingType::Number => "number",
            EncodingType::BigNumber => "bigNumber",
            EncodingType::Bool => "bool",
            EncodingType::Dict => "dict",
            EncodingType::List => "list",
            EncodingType::Object => "object",
            EncodingType::Any => "Any",
            EncodingType::DateTime => "datetime.datetime",
            EncodingType::TimeDelta => "datetime.timedelta",
        }
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingType {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" | "string" => Ok(EncodingType::Str),
            "int" => Ok(EncodingType::Int),
            "float" => Ok(EncodingType::Float),
            "number" => Ok(EncodingType::Number),
            "bigNumber" => Ok(EncodingType::BigNumber),
            "bool" | "boolean" => Ok(EncodingType::Bool),
            "dict" => Ok(EncodingType::Dict),
            "list" => Ok(EncodingType::List),
            "object" => Ok(EncodingType::Object),
            "Any" => Ok(EncodingType::Any),
            "datetime.datetime" | "datetime" => Ok(EncodingType::DateTime),
            "datetime.timedelta" | "timedelta" => Ok(EncodingType::TimeDelta),
            other => Err(EncodeError::UnknownType(other.to_string())),
        }
    }
}

/// Key names whose values are encoded as dates inside dicts and lists.
fn temporal_key(key: &str) -> Option<EncodingType> {
    match key {
        "datetime" | "datetime.datetime" => Some(EncodingType::DateTime),
        "timedelta" | "datetime.timedelta" => Some(EncodingType::TimeDelta),
        _ => None,
    }
}

fn is_marker(key: &str) -> bool {
    matches!(key, FIXED_MARKER | BIG_INT_MARKER | TIME_MARKER | DELTA_MARKER)
}

/// Contract argument encoder
pub struct Encoder;

impl Encoder {
    /// Encodes `value` for a contract argument declared as `type_name`.
    pub fn encode(type_name: &str, value: &Value) -> Result<Value, EncodeError> {
        Self::encode_as(type_name.parse()?, value)
    }

    pub fn encode_as(ty: EncodingType, value: &Value) -> Result<Value, EncodeError> {
        let fail = || EncodeError::invalid(ty.name(), value);
        match ty {
            EncodingType::Str => Ok(match value {
                Value::String(s) => Value::String(s.clone()),
                other => Value::String(other.to_string()),
            }),
            EncodingType::Int => {
                let decimal = to_decimal(value).ok_or_else(fail)?;
                Ok(int_to_wire(&decimal.trunc()))
            }
            EncodingType::Float | EncodingType::BigNumber => {
                let decimal = to_decimal(value).ok_or_else(fail)?;
                Ok(json!({ FIXED_MARKER: decimal.to_string() }))
            }
            EncodingType::Number => {
                let decimal = to_decimal(value).ok_or_else(fail)?;
                if decimal.is_integer() {
                    Ok(int_to_wire(&decimal.trunc()))
                } else {
                    Ok(json!({ FIXED_MARKER: decimal.to_string() }))
                }
            }
            EncodingType::Bool => match value {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                Value::String(s) if s == "true" => Ok(Value::Bool(true)),
                Value::String(s) if s == "false" => Ok(Value::Bool(false)),
                Value::Number(n) if n.as_f64() == Some(1.0) => Ok(Value::Bool(true)),
                Value::Number(n) if n.as_f64() == Some(0.0) => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
            EncodingType::Dict => match parse_container(value) {
                Some(map @ Value::Object(_)) => normalize(&map),
                _ => Err(fail()),
            },
            EncodingType::List => match parse_container(value) {
                Some(list @ Value::Array(_)) => normalize(&list),
                _ => Err(fail()),
            },
            EncodingType::Object => Self::encode_as(EncodingType::List, value)
                .or_else(|_| Self::encode_as(EncodingType::Dict, value)),
            EncodingType::Any => Ok(value.clone()),
            EncodingType::DateTime => {
                let dt = to_datetime(value).ok_or_else(fail)?;
                Ok(ContractValue::datetime(dt).to_wire())
            }
            EncodingType::TimeDelta => {
                let millis = to_millis(value).ok_or_else(fail)?;
                let delta = Duration::try_milliseconds(millis).ok_or_else(fail)?;
                Ok(ContractValue::timedelta(delta).to_wire())
            }
        }
    }

    /// Encodes and reads the result back as a typed contract value.
    pub fn to_value(type_name: &str, value: &Value) -> Result<ContractValue, EncodeError> {
        let wire = Self::encode(type_name, value)?;
        Ok(ContractValue::from_wire(&wire)?)
    }

    /// Coerces `value` into a decimal the way the `bigNumber` encoder does.
    pub fn big_number(value: &Value) -> Result<ContractingDecimal, EncodeError> {
        to_decimal(value).ok_or_else(|| EncodeError::invalid("bigNumber", value))
    }

    /// Encodes call kwargs by the declared argument types of a method.
    pub fn encode_kwargs(
        arguments: &[MethodArgument],
        kwargs: &Map<String, Value>,
    ) -> Result<Map<String, Value>, EncodeError> {
        if let Some(unknown) = kwargs
            .keys()
            .find(|name| !arguments.iter().any(|arg| &arg.name == *name))
        {
            return Err(EncodeError::UnexpectedArgument(unknown.clone()));
        }

        let mut encoded = Map::new();
        for argument in arguments {
            let value = kwargs
                .get(&argument.name)
                .ok_or_else(|| EncodeError::MissingArgument(argument.name.clone()))?;
            encoded.insert(
                argument.name.clone(),
                Self::encode(&argument.type_name, value)?,
            );
        }
        Ok(encoded)
    }
}

fn to_decimal(value: &Value) -> Option<ContractingDecimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(ContractingDecimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(ContractingDecimal::from_bigint(u.into()))
            } else {
                ContractingDecimal::from_f64(n.as_f64()?).ok()
            }
        }
        Value::String(s) => s.parse().ok(),
        Value::Object(map) if map.len() == 1 => match map.get(FIXED_MARKER) {
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts a container or its JSON text.
fn parse_container(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::String(s) => serde_json::from_str(s).ok(),
        _ => None,
    }
}

/// Normalizes nested values: fractional numbers become decimals and values
/// under temporal keys become dates. An object whose only key is temporal
/// collapses into the encoded value.
fn normalize(value: &Value) -> Result<Value, EncodeError> {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, inner)) = map.iter().next() {
                    if let Some(ty) = temporal_key(key) {
                        return Encoder::encode_as(ty, inner);
                    }
                    if is_marker(key) {
                        return Ok(value.clone());
                    }
                }
            }
            let mut out = Map::new();
            for (key, inner) in map {
                let encoded = match temporal_key(key) {
                    Some(ty) => Encoder::encode_as(ty, inner)?,
                    None => normalize(inner)?,
                };
                out.insert(key.clone(), encoded);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Number(n) if n.is_f64() => {
            let decimal = to_decimal(value).ok_or_else(|| EncodeError::invalid("float", value))?;
            if decimal.is_integer() {
                Ok(int_to_wire(&decimal.trunc()))
            } else {
                Ok(json!({ FIXED_MARKER: decimal.to_string() }))
            }
        }
        other => Ok(other.clone()),
    }
}

/// Truncates a JSON number to i64, refusing values outside its range.
fn number_to_i64(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f.trunc() as i64)
    })
}

fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => {
            let millis = number_to_i64(n)?;
            Utc.timestamp_millis_opt(millis).single().map(|dt| dt.naive_utc())
        }
        Value::String(s) => parse_datetime(s.trim()),
        _ => None,
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn to_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => number_to_i64(n),
        Value::String(s) => match s.trim().parse::<ContractingDecimal>() {
            Ok(decimal) => decimal.to_i64(),
            Err(_) => parse_datetime(s.trim()).map(|dt| dt.and_utc().timestamp_millis()),
        },
        _ => None,
    }
}
