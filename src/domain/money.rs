//! Money amounts.
//!
//! Stored as i64 minor units (hundredths of the currency unit) so sums are
//! exact. Arithmetic saturates instead of overflowing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Minor units per whole unit.
const SCALE: i64 = 100;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    /// Not digits with an optional sign, thousands commas and up to two decimals.
    InvalidFormat,
    TooLarge,
}

impl Money {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(SCALE))
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Parse "1200", "1,200.5", "-20", "0.05". More than two decimals is rejected.
    pub fn parse(raw: &str) -> Result<Self, MoneyParseError> {
        let raw = raw.trim();
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let digits = digits.replace(',', "");
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits.as_str(), ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) || frac.len() > 2 {
            return Err(MoneyParseError::InvalidFormat);
        }

        let whole: i64 = whole.parse().map_err(|_| MoneyParseError::TooLarge)?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| MoneyParseError::InvalidFormat)? * 10,
            _ => frac.parse().map_err(|_| MoneyParseError::InvalidFormat)?,
        };
        let minor = whole
            .checked_mul(SCALE)
            .and_then(|m| m.checked_add(frac))
            .ok_or(MoneyParseError::TooLarge)?;
        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

/// Whole amounts render without decimals ("150"); others with two ("12.50").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (whole, frac) = (abs / SCALE as u64, abs % SCALE as u64);
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            write!(f, "{}{}.{:02}", sign, whole, frac)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amounts() {
        assert_eq!(Money::parse("1200"), Ok(Money::from_units(1200)));
        assert_eq!(Money::parse("1,200.5"), Ok(Money::from_minor(120_050)));
        assert_eq!(Money::parse("0.05"), Ok(Money::from_minor(5)));
        assert_eq!(Money::parse("-20"), Ok(Money::from_units(-20)));
        assert_eq!(Money::parse("7."), Ok(Money::from_units(7)));
    }

    #[test]
    fn test_parse_rejects_sub_minor_precision() {
        assert_eq!(Money::parse("0.001"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(Money::parse("1.999"), Err(MoneyParseError::InvalidFormat));
    }

    #[test]
    fn test_parse_rejects_garbage_and_overflow() {
        assert_eq!(Money::parse(""), Err(MoneyParseError::InvalidFormat));
        assert_eq!(Money::parse(".5"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(Money::parse("1.2.3"), Err(MoneyParseError::InvalidFormat));
        assert_eq!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::TooLarge)
        );
        assert_eq!(
            Money::parse("92233720368547759"),
            Err(MoneyParseError::TooLarge)
        );
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let total = Money::parse("0.1").unwrap() + Money::parse("0.2").unwrap();
        assert_eq!(total, Money::parse("0.3").unwrap());
        assert_eq!(total.to_string(), "0.30");
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max + Money::from_minor(1), max);
        let min = Money::from_minor(i64::MIN);
        assert_eq!(min - Money::from_minor(1), min);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(150).to_string(), "150");
        assert_eq!(Money::from_minor(1250).to_string(), "12.50");
        assert_eq!(Money::from_units(-30).to_string(), "-30");
        assert_eq!(Money::from_minor(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0");
    }
}
