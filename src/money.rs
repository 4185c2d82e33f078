//! Integer-cents money primitive.
//!
//! All core arithmetic occurs in cents. Dollars only appear at display and
//! script-parsing boundaries.

use crate::error::EngineError;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(cents: i64) -> Self {
        Cents(cents)
    }

    /// Parse a decimal string ("12.34", "12", "-1") into cents. Rejects more
    /// than two fractional digits.
    pub fn parse(amount: &str) -> Result<Cents, EngineError> {
        let amount = amount.trim();
        let (whole, frac) = match amount.split_once('.') {
            Some((w, f)) => (w, f),
            None => (amount, ""),
        };
        if frac.len() > 2 {
            return Err(EngineError::InputValidation(format!(
                "too many decimal places: {amount}"
            )));
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(EngineError::InputValidation(format!(
                "invalid amount format: {amount}"
            )));
        }
        let negative = whole.starts_with('-');
        let whole_digits = whole.trim_start_matches('-');
        if !whole_digits.chars().all(|c| c.is_ascii_digit()) && !whole_digits.is_empty() {
            return Err(EngineError::InputValidation(format!(
                "invalid amount format: {amount}"
            )));
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(EngineError::InputValidation(format!(
                "invalid amount format: {amount}"
            )));
        }
        let whole_val: i64 = whole_digits.parse().unwrap_or(0);
        let padded_frac = format!("{frac:0<2}");
        let frac_val: i64 = if padded_frac.is_empty() {
            0
        } else {
            padded_frac.parse().map_err(|_| {
                EngineError::InputValidation(format!("invalid amount format: {amount}"))
            })?
        };
        let total = whole_val * 100 + frac_val;
        Ok(Cents(if negative { -total } else { total }))
    }

    /// Dollar value for display only.
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_add(self, other: Cents) -> Result<Cents, EngineError> {
        self.0
            .checked_add(other.0)
            .map(Cents)
            .ok_or_else(|| EngineError::Invariant("cents overflow".into()))
    }

    pub fn nonneg(self) -> Result<Cents, EngineError> {
        if self.0 < 0 {
            Err(EngineError::Invariant(format!(
                "negative amount not allowed: {}",
                self.0
            )))
        } else {
            Ok(self)
        }
    }

    pub fn min(self, other: Cents) -> Cents {
        if self.0 <= other.0 { self } else { other }
    }

    pub fn max(self, other: Cents) -> Cents {
        if self.0 >= other.0 { self } else { other }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Cents {
    type Output = Cents;
    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}
impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}
impl Sub for Cents {
    type Output = Cents;
    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}
impl SubAssign for Cents {
    fn sub_assign(&mut self, rhs: Cents) {
        self.0 -= rhs.0;
    }
}
impl std::iter::Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Self {
        iter.fold(Cents::ZERO, |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dollars_and_cents() {
        assert_eq!(Cents::parse("12.34").unwrap(), Cents(1234));
        assert_eq!(Cents::parse("12").unwrap(), Cents(1200));
        assert_eq!(Cents::parse("0.05").unwrap(), Cents(5));
        assert_eq!(Cents::parse(".50").unwrap(), Cents(50));
    }

    #[test]
    fn rejects_too_many_decimals() {
        assert!(Cents::parse("12.345").is_err());
    }

    #[test]
    fn round_trip_is_stable() {
        for x in ["0.01", "12.34", "100.00", "9999.99"] {
            let cents = Cents::parse(x).unwrap();
            let again = Cents::parse(&format!("{:.2}", cents.as_dollars())).unwrap();
            assert_eq!(cents, again);
        }
    }

    #[test]
    fn nonneg_rejects_negative() {
        assert!(Cents(-1).nonneg().is_err());
        assert!(Cents(0).nonneg().is_ok());
    }

    #[test]
    fn display_formats_as_currency() {
        assert_eq!(Cents(1234).to_string(), "$12.34");
        assert_eq!(Cents(5).to_string(), "$0.05");
    }
}
