use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

use crate::utils::constants::{DECIMAL_POINT, NEGATIVE_SIGN, TENTHS_PER_UNIT};

/// A signed decimal with exactly one fractional digit, stored as integer tenths.
///
/// `-3.2` is held as `-32`. Accumulation never touches floating point;
/// conversion to `f64` happens only when a value is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Measurement(i64);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMeasurementError {
    #[error("empty value")]
    Empty,

    #[error("missing digits")]
    MissingDigits,

    #[error("expected exactly one fractional digit after '.'")]
    MissingDecimalPoint,

    #[error("invalid digit {0:#04x}")]
    InvalidDigit(u8),

    #[error("value out of range")]
    Overflow,
}

impl Measurement {
    pub const ZERO: Measurement = Measurement(0);

    pub fn from_tenths(tenths: i64) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> i64 {
        self.0
    }

    /// Parse `-?\d+\.\d` from raw ASCII bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseMeasurementError> {
        let (negative, body) = match bytes.split_first() {
            None => return Err(ParseMeasurementError::Empty),
            Some((&NEGATIVE_SIGN, rest)) => (true, rest),
            Some(_) => (false, bytes),
        };

        // body = integer digits, '.', one fractional digit
        let (fraction, integer) = match body {
            [integer @ .., DECIMAL_POINT, fraction] => (*fraction, integer),
            [] => return Err(ParseMeasurementError::MissingDigits),
            _ => return Err(ParseMeasurementError::MissingDecimalPoint),
        };
        if integer.is_empty() {
            return Err(ParseMeasurementError::MissingDigits);
        }

        let mut value: i64 = 0;
        for &b in integer.iter().chain(std::iter::once(&fraction)) {
            if !b.is_ascii_digit() {
                return Err(ParseMeasurementError::InvalidDigit(b));
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(b - b'0')))
                .ok_or(ParseMeasurementError::Overflow)?;
        }

        Ok(Self(if negative { -value } else { value }))
    }

    /// Real-valued view for display only.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / TENTHS_PER_UNIT as f64
    }
}

impl Add for Measurement {
    type Output = Measurement;

    fn add(self, rhs: Measurement) -> Measurement {
        Measurement(self.0 + rhs.0)
    }
}

impl AddAssign for Measurement {
    fn add_assign(&mut self, rhs: Measurement) {
        self.0 += rhs.0;
    }
}

impl FromStr for Measurement {
    type Err = ParseMeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = TENTHS_PER_UNIT as u64;
        write!(f, "{}{}.{}", sign, abs / unit, abs % unit)
    }
}
