//! Monetary amounts for exchange rate quotes.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};

/// Number of fractional digits every amount is quantized to.
pub const PRECISION: u32 = 8;

/// Rounding applied when quantizing: half-up, i.e. ties move away from zero.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Quantize a decimal to [`PRECISION`] fractional digits using [`ROUNDING`].
///
/// Fails with [`ValidationError::AmountOverflow`] when the value is too
/// large to carry [`PRECISION`] fractional digits.
pub fn quantize(value: Decimal) -> ValidationResult<Decimal> {
    let mut rounded = value.round_dp_with_strategy(PRECISION, ROUNDING);
    rounded.rescale(PRECISION);
    if rounded.scale() != PRECISION {
        return Err(ValidationError::AmountOverflow(value.to_string()));
    }
    Ok(rounded)
}

/// Anything that can be read as a decimal amount.
pub trait DecimalLike {
    /// Convert to a decimal, failing on unparsable input.
    fn to_decimal(&self) -> ValidationResult<Decimal>;
}

impl DecimalLike for Decimal {
    fn to_decimal(&self) -> ValidationResult<Decimal> {
        Ok(*self)
    }
}

impl DecimalLike for str {
    fn to_decimal(&self) -> ValidationResult<Decimal> {
        let trimmed = self.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| ValidationError::UnparsableAmount(self.to_string()))
    }
}

impl DecimalLike for String {
    fn to_decimal(&self) -> ValidationResult<Decimal> {
        self.as_str().to_decimal()
    }
}

impl DecimalLike for f64 {
    fn to_decimal(&self) -> ValidationResult<Decimal> {
        Decimal::try_from(*self).map_err(|_| ValidationError::UnparsableAmount(self.to_string()))
    }
}

impl DecimalLike for f32 {
    fn to_decimal(&self) -> ValidationResult<Decimal> {
        Decimal::try_from(*self).map_err(|_| ValidationError::UnparsableAmount(self.to_string()))
    }
}

macro_rules! integer_decimal_like {
    ($($ty:ty),*) => {
        $(
            impl DecimalLike for $ty {
                fn to_decimal(&self) -> ValidationResult<Decimal> {
                    Ok(Decimal::from(*self))
                }
            }
        )*
    };
}

integer_decimal_like!(i32, i64, u32, u64);

impl<T: DecimalLike + ?Sized> DecimalLike for &T {
    fn to_decimal(&self) -> ValidationResult<Decimal> {
        (**self).to_decimal()
    }
}

/// A strictly positive amount with exactly [`PRECISION`] fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Create an amount from any decimal-like input.
    ///
    /// Fails with a format error if the input cannot be parsed or is too
    /// large to quantize, and with a negative error if it is zero or
    /// negative, either as given or once quantized.
    pub fn create(value: impl DecimalLike) -> ValidationResult<Self> {
        let value = value.to_decimal()?;
        if value <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(value.to_string()));
        }
        let quantized = quantize(value)?;
        if quantized.is_zero() {
            return Err(ValidationError::NonPositiveAmount(value.to_string()));
        }
        Ok(Self(quantized))
    }

    /// Get the amount.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Reciprocal of the amount. Not quantized and not validated.
    pub fn invert(&self) -> Decimal {
        Decimal::ONE / self.0
    }

    /// Product of two amounts. Not quantized and not validated.
    pub fn multiply(&self, other: &Money) -> ValidationResult<Decimal> {
        self.0
            .checked_mul(other.0)
            .ok_or_else(|| ValidationError::AmountOverflow(format!("{} * {}", self.0, other.0)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> ValidationResult<Self> {
        Self::create(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}
