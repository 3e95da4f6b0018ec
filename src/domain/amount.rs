//! Money type
//!
//! Domain primitive for currency amounts. Values are validated at
//! construction time so a negative amount cannot exist in the system.
//! Full precision is kept internally; display is always two decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Decimal places used when rendering money.
pub const DISPLAY_SCALE: u32 = 2;

/// Maximum allowed amount (1 billion)
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Money represents a non-negative currency value.
///
/// # Invariants
/// - Value is never negative
/// - Maximum value is 1 billion
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use affiliate_boss::domain::Money;
///
/// let money = Money::new(Decimal::new(40790, 2)).unwrap();
/// assert_eq!(money.to_string(), "407.90");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(Decimal);

/// Errors that can occur when creating Money
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Amount must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create Money with validation.
    ///
    /// # Errors
    /// - `MoneyError::Negative` if value < 0
    /// - `MoneyError::Overflow` if value > 1 billion
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative(value));
        }
        if value > MAX_AMOUNT {
            return Err(MoneyError::Overflow);
        }
        Ok(Self(value.normalize()))
    }

    /// Build from integer cents. Used by fixtures.
    pub fn from_cents(cents: i64) -> Result<Self, MoneyError> {
        Self::new(Decimal::new(cents, DISPLAY_SCALE))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Value rounded to cents, half away from zero.
    pub fn rounded(&self) -> Decimal {
        round_cents(self.0)
    }

    /// Subtract, flooring at zero.
    pub fn saturating_sub(&self, other: Money) -> Money {
        if other.0 >= self.0 {
            Money::ZERO
        } else {
            Money(self.0 - other.0)
        }
    }

    /// Multiply by a non-negative factor (rates, tier multipliers).
    pub fn scale_by(&self, factor: Decimal) -> Result<Money, MoneyError> {
        Money::new(self.0 * factor)
    }

    /// Percentage of this amount, e.g. `percent(dec!(2.9))`.
    pub fn percent(&self, rate: Decimal) -> Result<Money, MoneyError> {
        Money::new(self.0 * rate / Decimal::ONE_HUNDRED)
    }
}

/// Round a decimal to cents, half away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| MoneyError::ParseError(e.to_string()))?;
        Money::new(decimal)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Money::from_str(&value)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

// Sum of two valid amounts can only overflow, which saturates at the cap
// instead of failing inside aggregate reductions.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money((self.0 + rhs.0).min(MAX_AMOUNT))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}
