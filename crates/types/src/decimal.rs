//! Fixed point decimal used for contract floats.
//!
//! Contracts never see binary floating point: every `float` argument is
//! carried as a decimal string with at most [`FIXED_PRECISION`] fractional
//! digits. Extra digits are truncated toward zero.

use crate::error::DecodeError;
use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits kept by [`ContractingDecimal`].
pub const FIXED_PRECISION: u32 = 30;

/// Largest decimal exponent accepted when parsing (`1e400`).
const MAX_EXPONENT: i64 = 400;

fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Signed decimal with 30 fractional digits.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContractingDecimal {
    /// Value scaled by `10^FIXED_PRECISION`.
    units: BigInt,
}

impl ContractingDecimal {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_bigint(value: BigInt) -> Self {
        Self {
            units: value * pow10(FIXED_PRECISION),
        }
    }

    /// Converts a finite `f64` through its shortest round-trip representation,
    /// so `0.1` becomes exactly `0.1`.
    pub fn from_f64(value: f64) -> Result<Self, DecodeError> {
        if !value.is_finite() {
            return Err(DecodeError::InvalidDecimal(value.to_string()));
        }
        format!("{}", value).parse()
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> BigInt {
        &self.units / pow10(FIXED_PRECISION)
    }

    pub fn is_integer(&self) -> bool {
        (&self.units % pow10(FIXED_PRECISION)).is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.units.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.units.sign() == Sign::Minus
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.to_string().parse().ok()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.trunc().to_i64()
    }
}

impl FromStr for ContractingDecimal {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidDecimal(s.to_string());
        let text = s.trim();

        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
            Some(pos) => {
                let exponent: i64 = unsigned[pos + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..pos], exponent)
            }
            None => (unsigned, 0),
        };
        if exponent.abs() > MAX_EXPONENT {
            return Err(invalid());
        }

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let digits = BigInt::from_str(&digits).map_err(|_| invalid())?;

        let shift = FIXED_PRECISION as i64 + exponent - frac_part.len() as i64;
        let mut units = if shift >= 0 {
            digits * pow10(shift as u32)
        } else {
            digits / pow10((-shift) as u32)
        };
        if negative {
            units = -units;
        }
        Ok(Self { units })
    }
}

impl fmt::Display for ContractingDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = pow10(FIXED_PRECISION);
        let magnitude = self.units.magnitude();
        let int_part = magnitude / scale.magnitude();
        let frac_part = magnitude % scale.magnitude();

        let frac = format!("{:0>width$}", frac_part.to_string(), width = FIXED_PRECISION as usize);
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };

        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}.{}", sign, int_part, frac)
    }
}

impl fmt::Debug for ContractingDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractingDecimal({})", self)
    }
}

impl From<i64> for ContractingDecimal {
    fn from(value: i64) -> Self {
        Self::from_bigint(BigInt::from(value))
    }
}

impl From<BigInt> for ContractingDecimal {
    fn from(value: BigInt) -> Self {
        Self::from_bigint(value)
    }
}

impl Serialize for ContractingDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContractingDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl<'de> Visitor<'de> for DecimalVisitor {
            type Value = ContractingDecimal;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ContractingDecimal::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ContractingDecimal::from_bigint(BigInt::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                ContractingDecimal::from_f64(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}
