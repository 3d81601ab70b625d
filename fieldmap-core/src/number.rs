//! Arbitrary precision numbers using dashu
//!
//! Numeric field values are carried as dashu-float `DBig` so that
//! arithmetic actions (add, divide, average) never lose decimal digits.

use dashu_float::DBig;
use dashu_float::ops::Abs;
use dashu_int::IBig;
use dashu_int::ops::BitTest;
use serde::{Deserialize, Serialize, Serializer, Deserializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow: result too large")]
    Overflow,
}

/// Working precision for calculations (decimal digits)
const DEFAULT_PRECISION: usize = 50;

/// Arbitrary precision decimal number
///
/// All operations return Results or new Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(DEFAULT_PRECISION).value()
    }

    /// Create from string representation
    /// Supports: "123", "3.14", "1.5e10", "602214076e15", "-42"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        // Integer mantissa with exponent: keep it exact, no float intermediary
        if (s.contains('e') || s.contains('E')) && !s.contains('.') {
            let s_lower = s.to_lowercase();
            let parts: Vec<&str> = s_lower.split('e').collect();
            if parts.len() == 2 {
                let mantissa: IBig = parts[0].parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;
                let exp: i32 = parts[1].parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;
                let result = DBig::from_parts(mantissa, exp as isize);
                return Ok(Self { inner: Self::with_work_precision(result) });
            }
        }

        let inner: DBig = s.parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create from ratio (exact division); a zero denominator yields zero
    pub fn from_ratio(num: i64, den: i64) -> Self {
        if den == 0 {
            return Self { inner: DBig::ZERO };
        }
        let n = Self::with_work_precision(DBig::from(num));
        let d = Self::with_work_precision(DBig::from(den));
        Self { inner: n / d }
    }

    /// Create from f64 (may lose precision for very large or very small values)
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if f.is_nan() || f.is_infinite() {
            return Err(NumberError::Overflow);
        }
        Self::from_str(&format!("{:.15}", f))
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        let floor_val = self.inner.clone().floor();
        self.inner == floor_val
    }

    // ========== Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    pub fn neg(&self) -> Self {
        Self { inner: -self.inner.clone() }
    }

    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    /// Largest integer <= x
    pub fn floor(&self) -> Self {
        Self { inner: self.inner.clone().floor() }
    }

    /// Smallest integer >= x
    pub fn ceil(&self) -> Self {
        Self { inner: self.inner.clone().ceil() }
    }

    /// Round half away from zero
    pub fn round(&self) -> Self {
        let half = Self::from_ratio(1, 2);
        let magnitude = self.abs().add(&half).floor();
        if self.is_negative() {
            magnitude.neg()
        } else {
            magnitude
        }
    }

    // ========== Conversion ==========

    /// Try to convert to i64
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }

        // DBig stores as significand * 10^exponent
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let sig_i64: i64 = significand.try_into().ok()?;

        if exponent == 0 {
            Some(sig_i64)
        } else if exponent > 0 && exponent <= 18 {
            sig_i64.checked_mul(10_i64.checked_pow(exponent as u32)?)
        } else if exponent < 0 && exponent >= -18 {
            let divisor = 10_i64.checked_pow((-exponent) as u32)?;
            if sig_i64 % divisor == 0 {
                Some(sig_i64 / divisor)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> Option<f64> {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();

        let sig_f64: f64 = if significand.bit_len() <= 53 {
            let as_i64: i64 = significand.try_into().ok()?;
            as_i64 as f64
        } else {
            // Shift right to fit in 53 bits, then scale back up
            let extra_bits = significand.bit_len() - 53;
            let shifted = &significand >> extra_bits;
            let shifted_i64: i64 = shifted.try_into().ok()?;
            (shifted_i64 as f64) * 2_f64.powi(extra_bits as i32)
        };

        let result = if exponent == 0 {
            sig_f64
        } else if exponent > 0 && exponent <= 308 {
            sig_f64 * 10_f64.powi(exponent as i32)
        } else if exponent < 0 && exponent >= -308 {
            sig_f64 / 10_f64.powi((-exponent) as i32)
        } else {
            return None;
        };

        if result.is_finite() {
            Some(result)
        } else {
            None
        }
    }

    /// Exact plain decimal rendering, without exponent or trailing zeros
    pub fn to_plain_string(&self) -> String {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let rendered = significand.to_string();
        let (sign, digits) = match rendered.strip_prefix('-') {
            Some(d) => ("-", d),
            None => ("", rendered.as_str()),
        };
        if digits == "0" {
            return "0".to_string();
        }

        if exponent >= 0 {
            return format!("{}{}{}", sign, digits, "0".repeat(exponent as usize));
        }
        let places = exponent.unsigned_abs();
        let (int_part, frac_part) = if digits.len() > places {
            let (i, f) = digits.split_at(digits.len() - places);
            (i.to_string(), f.to_string())
        } else {
            ("0".to_string(), format!("{}{}", "0".repeat(places - digits.len()), digits))
        };
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}
