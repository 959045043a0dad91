//! Fixed-point donation amount.
//!
//! All money in the widget uses a 1e-6 (micros) fixed-point representation
//! stored as `i64`. The donation API speaks JSON numbers; they are converted
//! at the boundary (rounded to the nearest micro) so that every comparison
//! inside the engine, most importantly "does the fresh quote equal the
//! amount already in the cart", is exact integer equality.
//!
//! # Display
//!
//! [`Amount`]'s `Display` renders two decimal places (`"1.23"`), rounding
//! half away from zero. That is the only representation the view ever sees.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Micros per currency unit.
pub const MICROS_SCALE: i64 = 1_000_000;

const MICROS_PER_CENT: i64 = MICROS_SCALE / 100;

// ---------------------------------------------------------------------------
// Amount newtype
// ---------------------------------------------------------------------------

/// A monetary amount at 1e-6 scale.
///
/// There is no `From<i64>`; use [`Amount::from_micros`] or
/// [`Amount::from_cents`] so the scale is explicit at every call site.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[inline]
    pub const fn from_micros(raw: i64) -> Self {
        Amount(raw)
    }

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents * MICROS_PER_CENT)
    }

    #[inline]
    pub const fn micros(self) -> i64 {
        self.0
    }

    /// Convert a JSON/float value, rounding to the nearest micro.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_f64(v: f64) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        let scaled = (v * MICROS_SCALE as f64).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Amount(scaled as i64))
    }

    /// Lossy conversion for the wire.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / MICROS_SCALE as f64
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `None` for zero and negative amounts.
    ///
    /// Host carts report "no donation" as `0`, so a zero amount and an
    /// absent one mean the same thing everywhere in the engine.
    #[inline]
    pub fn non_zero(self) -> Option<Amount> {
        if self.0 > 0 {
            Some(self)
        } else {
            None
        }
    }

    /// Subtraction that floors at zero.
    #[inline]
    pub fn saturating_sub_floor_zero(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0).max(0))
    }

    /// Parse a decimal string (`"12.5"`, `"0.01"`) without floating point.
    ///
    /// Accepts an optional leading sign and at most 6 fractional digits.
    pub fn parse(s: &str) -> Result<Amount, AmountParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(AmountParseError::Invalid(s.to_string()));
        }
        if frac_part.len() > 6 {
            return Err(AmountParseError::TooManyDecimalPlaces(s.to_string()));
        }

        let int_val: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| AmountParseError::Invalid(s.to_string()))?
        };

        let frac_val: i64 = format!("{frac_part:0<6}")
            .parse()
            .map_err(|_| AmountParseError::Invalid(s.to_string()))?;

        let micros = int_val
            .checked_mul(MICROS_SCALE)
            .and_then(|v| v.checked_add(frac_val))
            .ok_or_else(|| AmountParseError::Invalid(s.to_string()))?;

        Ok(Amount(if negative { -micros } else { micros }))
    }

    /// Whole cents, rounded half away from zero.
    fn rounded_cents(self) -> i64 {
        let half = MICROS_PER_CENT / 2;
        if self.0 >= 0 {
            self.0.saturating_add(half) / MICROS_PER_CENT
        } else {
            self.0.saturating_sub(half) / MICROS_PER_CENT
        }
    }
}

/// Saturates at the `i64` micros bounds.
impl Add for Amount {
    type Output = Amount;
    #[inline]
    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

/// Saturates at the `i64` micros bounds.
impl Sub for Amount {
    type Output = Amount;
    #[inline]
    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.rounded_cents();
        let units = cents / 100;
        let frac = (cents % 100).abs();
        if cents < 0 && units == 0 {
            write!(f, "-0.{frac:02}")
        } else {
            write!(f, "{units}.{frac:02}")
        }
    }
}

// ---------------------------------------------------------------------------
// Parse error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    Empty,
    Invalid(String),
    TooManyDecimalPlaces(String),
}

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountParseError::Empty => write!(f, "amount is empty"),
            AmountParseError::Invalid(raw) => write!(f, "amount could not be parsed: '{raw}'"),
            AmountParseError::TooManyDecimalPlaces(raw) => {
                write!(f, "amount has more than 6 decimal places: '{raw}'")
            }
        }
    }
}

impl std::error::Error for AmountParseError {}

// ---------------------------------------------------------------------------
// Serde: JSON numbers on the wire, decimal strings tolerated
// ---------------------------------------------------------------------------

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireAmount::deserialize(deserializer)? {
            WireAmount::Number(v) => Amount::from_f64(v)
                .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {v}"))),
            WireAmount::Text(s) => Amount::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
