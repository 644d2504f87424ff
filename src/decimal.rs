//! Fixed-point numeric type with 4 decimal places.
//!
//! Wraps `rust_decimal` with scale enforcement so balances, amounts, rates
//! and thresholds all share one exact representation. No floats are used
//! anywhere in the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A decimal value carrying exactly 4 decimal places.
///
/// Every arithmetic result is rescaled back to 4 places, so repeated
/// compounding in the projectors stays exact for the rates used in practice.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use ledger_engine::Decimal4;
///
/// let amount = Decimal4::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Decimal4(Decimal);

impl Decimal4 {
    /// Number of decimal places maintained by every operation.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Decimal4(Decimal::ZERO);

    /// Creates a `Decimal4` from a `Decimal`, normalizing to 4 places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Decimal4(normalized)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Decimal4(self.0.abs())
    }
}

impl From<i64> for Decimal4 {
    fn from(value: i64) -> Self {
        Decimal4::new(Decimal::from(value))
    }
}

impl FromStr for Decimal4 {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Decimal4::new(decimal))
    }
}

impl fmt::Display for Decimal4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Add for Decimal4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Decimal4::new(self.0 + rhs.0)
    }
}

impl AddAssign for Decimal4 {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Decimal4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Decimal4::new(self.0 - rhs.0)
    }
}

impl SubAssign for Decimal4 {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Mul for Decimal4 {
    type Output = Self;

    // balance * rate steps in accrual and projection
    fn mul(self, rhs: Self) -> Self::Output {
        Decimal4::new(self.0 * rhs.0)
    }
}

impl Neg for Decimal4 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Decimal4(-self.0)
    }
}

impl Serialize for Decimal4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.4}", self.0))
    }
}

impl<'de> Deserialize<'de> for Decimal4 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Decimal4::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_normalizes_scale() {
        let d = Decimal4::from_str("1.0").unwrap();
        assert_eq!(d.to_string(), "1.0000");

        let d = Decimal4::from_str("1.1234").unwrap();
        assert_eq!(d.to_string(), "1.1234");

        let d = Decimal4::from_str("  2.5  ").unwrap();
        assert_eq!(d.to_string(), "2.5000");
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = Decimal4::from_str("1.5").unwrap();
        let b = Decimal4::from_str("2.5").unwrap();

        assert_eq!((a + b).to_string(), "4.0000");
        assert_eq!((b - a).to_string(), "1.0000");
    }

    #[test]
    fn test_multiplication_for_rate_steps() {
        let balance = Decimal4::from_str("105").unwrap();
        let rate = Decimal4::from_str("0.1").unwrap();

        assert_eq!((balance * rate).to_string(), "10.5000");

        let balance = Decimal4::from_str("115.5").unwrap();
        assert_eq!((balance * rate).to_string(), "11.5500");
    }

    #[test]
    fn test_negation_and_abs() {
        let d = Decimal4::from_str("-20.5").unwrap();

        assert!(d.is_negative());
        assert!(!(-d).is_negative());
        assert_eq!(d.abs().to_string(), "20.5000");
        assert_eq!((-d).to_string(), "20.5000");
    }

    #[test]
    fn test_zero_is_not_negative() {
        assert!(Decimal4::ZERO.is_zero());
        assert!(!Decimal4::ZERO.is_negative());
    }

    #[test]
    fn test_from_integer() {
        assert_eq!(Decimal4::from(242).to_string(), "242.0000");
        assert_eq!(Decimal4::from(-144).to_string(), "-144.0000");
    }
}
