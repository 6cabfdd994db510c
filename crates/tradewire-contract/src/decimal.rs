//! Exact fixed-scale decimal values.
//!
//! Balances and prices travel the wire as a four-integer tuple (see
//! [`crate::scalar`]); this module is the domain side of that boundary:
//! a 96-bit unsigned mantissa, a scale of 0..=28, and an explicit sign.
//! All conversions are explicit; there are no `From` impls for floats.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum scale (number of fractional digits) a decimal may carry.
pub const MAX_SCALE: u8 = 28;

/// Upper bound (exclusive) of the 96-bit mantissa.
pub const MANTISSA_LIMIT: u128 = 1 << 96;

/// Errors from constructing or combining decimal values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// Mantissa does not fit in 96 bits.
    #[error("mantissa {0} exceeds 96 bits")]
    MantissaOverflow(u128),
    /// Scale exceeds [`MAX_SCALE`].
    #[error("scale {0} exceeds maximum of {MAX_SCALE}")]
    ScaleOutOfRange(u8),
    /// Text input is not a valid decimal literal.
    #[error("invalid decimal literal: {0}")]
    InvalidLiteral(String),
    /// An arithmetic result does not fit the representable range.
    #[error("decimal arithmetic overflow")]
    ArithmeticOverflow,
}

/// An exact decimal number: `(-1)^sign * mantissa * 10^(-scale)`.
///
/// The mantissa is limited to 96 bits and the scale to 28, mirroring the
/// wire tuple exactly, so every `Decimal` is encodable and every valid
/// wire tuple decodes to a distinct `Decimal`.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: u128,
    scale: u8,
    negative: bool,
}

impl Decimal {
    /// Zero at scale 0.
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
        negative: false,
    };

    /// Construct from raw parts.
    ///
    /// Negative zero is normalized to positive so that equal values
    /// compare equal regardless of how they were built.
    pub fn from_parts(mantissa: u128, scale: u8, negative: bool) -> Result<Self, DecimalError> {
        if mantissa >= MANTISSA_LIMIT {
            return Err(DecimalError::MantissaOverflow(mantissa));
        }
        if scale > MAX_SCALE {
            return Err(DecimalError::ScaleOutOfRange(scale));
        }
        Ok(Self {
            mantissa,
            scale,
            negative: negative && mantissa != 0,
        })
    }

    /// Construct a whole number.
    pub fn from_i64(value: i64) -> Self {
        Self {
            mantissa: value.unsigned_abs() as u128,
            scale: 0,
            negative: value < 0,
        }
    }

    /// Raw 96-bit mantissa.
    pub fn mantissa(&self) -> u128 {
        self.mantissa
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// True for values strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// True for zero at any scale.
    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Checked addition; `None` when the result leaves the representable range.
    pub fn checked_add(&self, other: &Decimal) -> Option<Decimal> {
        let (a, b, scale) = align(self, other)?;
        let (mantissa, negative) = match (self.negative, other.negative) {
            (false, false) => (a.checked_add(b)?, false),
            (true, true) => (a.checked_add(b)?, true),
            (false, true) => signed_diff(a, b),
            (true, false) => signed_diff(b, a),
        };
        Decimal::from_parts(mantissa, scale, negative).ok()
    }

    /// Checked subtraction; `None` when the result leaves the representable range.
    pub fn checked_sub(&self, other: &Decimal) -> Option<Decimal> {
        let negated = Decimal {
            mantissa: other.mantissa,
            scale: other.scale,
            negative: !other.negative && other.mantissa != 0,
        };
        self.checked_add(&negated)
    }

    /// Checked multiplication; `None` when the result leaves the
    /// representable range even after dropping trailing fractional zeros.
    pub fn checked_mul(&self, other: &Decimal) -> Option<Decimal> {
        let mut mantissa = self.mantissa.checked_mul(other.mantissa)?;
        let mut scale = u16::from(self.scale) + u16::from(other.scale);
        // Shed trailing zeros to pull oversized results back into range.
        while (mantissa >= MANTISSA_LIMIT || scale > u16::from(MAX_SCALE))
            && scale > 0
            && mantissa % 10 == 0
        {
            mantissa /= 10;
            scale -= 1;
        }
        if scale > u16::from(MAX_SCALE) {
            return None;
        }
        Decimal::from_parts(mantissa, scale as u8, self.negative != other.negative).ok()
    }
}

/// Magnitude comparison with both mantissas brought to a common scale.
///
/// If upscaling one side overflows 128 bits its magnitude necessarily
/// exceeds the other side's 96-bit mantissa, so the answer is still exact.
fn magnitude_cmp(a: &Decimal, b: &Decimal) -> Ordering {
    match a.scale.cmp(&b.scale) {
        Ordering::Equal => a.mantissa.cmp(&b.mantissa),
        Ordering::Less => match upscale(a.mantissa, b.scale - a.scale) {
            Some(scaled) => scaled.cmp(&b.mantissa),
            None => Ordering::Greater,
        },
        Ordering::Greater => match upscale(b.mantissa, a.scale - b.scale) {
            Some(scaled) => a.mantissa.cmp(&scaled),
            None => Ordering::Less,
        },
    }
}

fn upscale(mantissa: u128, digits: u8) -> Option<u128> {
    let mut value = mantissa;
    for _ in 0..digits {
        value = value.checked_mul(10)?;
    }
    Some(value)
}

/// Bring two magnitudes to a common scale, preferring the larger scale.
fn align(a: &Decimal, b: &Decimal) -> Option<(u128, u128, u8)> {
    if a.scale == b.scale {
        return Some((a.mantissa, b.mantissa, a.scale));
    }
    if a.scale < b.scale {
        let scaled = upscale(a.mantissa, b.scale - a.scale)?;
        Some((scaled, b.mantissa, b.scale))
    } else {
        let scaled = upscale(b.mantissa, a.scale - b.scale)?;
        Some((a.mantissa, scaled, a.scale))
    }
}

/// `a - b` over magnitudes, returning the magnitude and sign of the result.
fn signed_diff(a: u128, b: u128) -> (u128, bool) {
    if a >= b {
        (a - b, false)
    } else {
        (b - a, true)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => magnitude_cmp(self, other),
            (true, true) => magnitude_cmp(other, self),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let sign = if self.negative { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int, frac)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecimalError::InvalidLiteral(s.to_string());
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if rest.is_empty() {
            return Err(invalid());
        }
        let (int_part, frac_part) = match rest.split_once('.') {
            Some((i, f)) => (i, f),
            None => (rest, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let scale = frac_part.len();
        if scale > MAX_SCALE as usize {
            return Err(DecimalError::ScaleOutOfRange(scale.min(255) as u8));
        }
        let mut mantissa: u128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            let digit = c.to_digit(10).ok_or_else(invalid)? as u128;
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(digit))
                .ok_or(DecimalError::MantissaOverflow(u128::MAX))?;
        }
        Decimal::from_parts(mantissa, scale as u8, negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("12.00").to_string(), "12.00");
        assert_eq!(dec("-0.005").to_string(), "-0.005");
        assert_eq!(dec("42").to_string(), "42");
        assert_eq!(dec("0.1").mantissa(), 1);
        assert_eq!(dec("0.1").scale(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Decimal>().is_err());
        assert!("abc".parse::<Decimal>().is_err());
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!(".".parse::<Decimal>().is_err());
        assert!("1e5".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_scale_limit() {
        let too_fine = format!("0.{}", "1".repeat(29));
        assert!(matches!(
            too_fine.parse::<Decimal>(),
            Err(DecimalError::ScaleOutOfRange(_))
        ));
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(dec("12.00"), dec("12"));
        assert_eq!(dec("0.000"), dec("0"));
        assert_ne!(dec("12.01"), dec("12.1"));
    }

    #[test]
    fn test_negative_zero_normalizes() {
        let z = Decimal::from_parts(0, 2, true).unwrap();
        assert!(!z.is_negative());
        assert_eq!(z, Decimal::ZERO);
    }

    #[test]
    fn test_ordering() {
        assert!(dec("1.5") > dec("1.49"));
        assert!(dec("-2") < dec("0.01"));
        assert!(dec("-2") < dec("-1.99"));
        assert!(dec("10") > dec("9.9999999999999999999999999999"));
    }

    #[test]
    fn test_checked_add_sub() {
        assert_eq!(dec("1.25").checked_add(&dec("0.75")).unwrap(), dec("2"));
        assert_eq!(dec("1").checked_sub(&dec("2.5")).unwrap(), dec("-1.5"));
        assert_eq!(dec("-1").checked_add(&dec("-2")).unwrap(), dec("-3"));
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(dec("12.5").checked_mul(&dec("4")).unwrap(), dec("50"));
        assert_eq!(dec("-0.5").checked_mul(&dec("0.5")).unwrap(), dec("-0.25"));
        assert_eq!(dec("0").checked_mul(&dec("99")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_mul_overflow_is_none() {
        let big = Decimal::from_parts(MANTISSA_LIMIT - 1, 0, false).unwrap();
        assert!(big.checked_mul(&big).is_none());
    }

    #[test]
    fn test_from_i64() {
        assert_eq!(Decimal::from_i64(-42), dec("-42"));
        assert_eq!(Decimal::from_i64(0), Decimal::ZERO);
    }
}
