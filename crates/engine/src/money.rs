use std::{
    fmt,
    ops::{AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (rates, budgets,
/// plan costs, actuals) to avoid floating-point drift. The only place a
/// fractional factor enters is [`Money::scale`], which rounds back to minor
/// units immediately.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates a new amount from whole major units.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a fractional factor, rounding half away from zero.
    #[must_use]
    pub fn scale(self, factor: f64) -> Money {
        Money((self.0 as f64 * factor).round() as i64)
    }

    /// Divides by a whole divisor, rounding half away from zero.
    ///
    /// A zero divisor yields [`Money::ZERO`].
    #[must_use]
    pub fn split(self, parts: i64) -> Money {
        if parts == 0 {
            return Money::ZERO;
        }
        Money((self.0 as f64 / parts as f64).round() as i64)
    }

    /// Pairs the amount with a currency for display, e.g. `1500000.00 IDR`.
    #[must_use]
    pub const fn in_currency(self, currency: Currency) -> Priced {
        Priced {
            amount: self,
            currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses an amount written in major units.
    ///
    /// An optional sign, then digits with `.` or `,` as the decimal
    /// separator and at most two decimals. There is no thousands separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason: &str| EngineError::InvalidAmount(format!("{reason}: '{trimmed}'"));

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if digits.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (major, fraction) = digits.split_once(['.', ',']).unwrap_or((digits, ""));
        let is_number = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if major.is_empty() || !is_number(major) || !is_number(fraction) {
            return Err(invalid("not a number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("more than two decimals"));
        }

        let major: i64 = major.parse().map_err(|_| invalid("amount too large"))?;
        let minor: i64 = format!("{fraction:0<2}")
            .parse()
            .map_err(|_| invalid("not a number"))?;
        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

/// A [`Money`] amount displayed with its currency code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Priced {
    pub amount: Money,
    pub currency: Currency,
}

impl fmt::Display for Priced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
