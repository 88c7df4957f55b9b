//! Exchange rate quotes.

use std::fmt;

use currency_convert_common::{
    parse_timestamp, CurrencyCode, DecimalLike, Money, Timestamp, ValidationResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable quote: one unit of `currency_from` buys `rate` units of
/// `currency_to`, effective at `effective_at`.
///
/// Equality is structural over all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rate {
    currency_from: CurrencyCode,
    currency_to: CurrencyCode,
    rate: Money,
    effective_at: Timestamp,
}

impl Rate {
    /// Build a rate from already validated parts.
    pub fn new(
        currency_from: CurrencyCode,
        currency_to: CurrencyCode,
        rate: Money,
        effective_at: Timestamp,
    ) -> Self {
        Self {
            currency_from,
            currency_to,
            rate,
            effective_at,
        }
    }

    /// Validate raw parts and build a rate.
    ///
    /// Checks run in order (source code, target code, amount, timestamp)
    /// and the first failure is returned.
    pub fn create(
        currency_from: &str,
        currency_to: &str,
        rate: impl DecimalLike,
        effective_at: &str,
    ) -> ValidationResult<Self> {
        let currency_from = CurrencyCode::create(currency_from)?;
        let currency_to = CurrencyCode::create(currency_to)?;
        let rate = Money::create(rate)?;
        let effective_at = parse_timestamp(effective_at)?;
        Ok(Self::new(currency_from, currency_to, rate, effective_at))
    }

    /// Same as [`Rate::create`] for a timestamp that is already parsed.
    pub fn create_at(
        currency_from: &str,
        currency_to: &str,
        rate: impl DecimalLike,
        effective_at: Timestamp,
    ) -> ValidationResult<Self> {
        let currency_from = CurrencyCode::create(currency_from)?;
        let currency_to = CurrencyCode::create(currency_to)?;
        let rate = Money::create(rate)?;
        Ok(Self::new(currency_from, currency_to, rate, effective_at))
    }

    /// Source currency.
    pub fn currency_from(&self) -> &CurrencyCode {
        &self.currency_from
    }

    /// Target currency.
    pub fn currency_to(&self) -> &CurrencyCode {
        &self.currency_to
    }

    /// Quoted amount.
    pub fn rate(&self) -> Money {
        self.rate
    }

    /// When the quote takes effect.
    pub fn effective_at(&self) -> Timestamp {
        self.effective_at
    }

    /// The opposite quote: currencies swapped, amount replaced by its reciprocal.
    pub fn invert(&self) -> ValidationResult<Rate> {
        self.derive(
            self.currency_to.clone(),
            self.currency_from.clone(),
            self.rate.invert(),
            self.effective_at,
        )
    }

    /// Compose `other` followed by `self`.
    ///
    /// Caller guarantees `other.currency_to == self.currency_from`; this is
    /// not checked. The result quotes `other.currency_from` to
    /// `self.currency_to` and takes the later of the two effective times.
    pub fn multiply(&self, other: &Rate) -> ValidationResult<Rate> {
        self.derive(
            other.currency_from.clone(),
            self.currency_to.clone(),
            self.rate.multiply(&other.rate)?,
            self.effective_at.max(other.effective_at),
        )
    }

    fn derive(
        &self,
        currency_from: CurrencyCode,
        currency_to: CurrencyCode,
        amount: Decimal,
        effective_at: Timestamp,
    ) -> ValidationResult<Rate> {
        let rate = Money::create(amount)?;
        Ok(Self::new(currency_from, currency_to, rate, effective_at))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {} @ {}",
            self.currency_from,
            self.currency_to,
            self.rate,
            self.effective_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use currency_convert_common::{ValidationError, ValidationKind};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn usd_eur(amount: &str) -> Rate {
        Rate::create("USD", "EUR", amount, "2023-10-01T00:00:00").unwrap()
    }

    #[test]
    fn test_create_valid() {
        let rate = usd_eur("0.85");
        assert_eq!(rate.currency_from(), "USD");
        assert_eq!(rate.currency_to(), "EUR");
        assert_eq!(rate.rate(), Money::create("0.85").unwrap());
        assert_eq!(
            rate.effective_at(),
            Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_create_rejects_each_field() {
        assert!(matches!(
            Rate::create("US", "EUR", "0.85", "2023-10-01"),
            Err(ValidationError::InvalidCurrencyCode(_))
        ));
        assert!(matches!(
            Rate::create("USD", "EURO", "0.85", "2023-10-01"),
            Err(ValidationError::InvalidCurrencyCode(_))
        ));
        assert!(matches!(
            Rate::create("USD", "EUR", "invalid_rate", "2023-10-01"),
            Err(ValidationError::UnparsableAmount(_))
        ));
        assert_eq!(
            Rate::create("USD", "EUR", "0.00", "2023-10-01")
                .unwrap_err()
                .kind(),
            ValidationKind::Negative
        );
        assert!(matches!(
            Rate::create("USD", "EUR", "0.85", "invalid_date"),
            Err(ValidationError::UnparsableTimestamp(_))
        ));
    }

    #[test]
    fn test_create_reports_currency_before_amount() {
        let err = Rate::create("XX", "EUR", "-1", "nope").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCurrencyCode(code) if code == "XX"));

        let err = Rate::create("USD", "EUR", "-1", "nope").unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveAmount(_)));
    }

    #[test]
    fn test_invert() {
        let rate = usd_eur("0.65");
        let inverted = rate.invert().unwrap();

        assert_eq!(inverted.currency_from(), "EUR");
        assert_eq!(inverted.currency_to(), "USD");
        assert_eq!(inverted.rate().value(), dec!(1.53846154));
        assert_eq!(inverted.effective_at(), rate.effective_at());
    }

    #[test]
    fn test_invert_twice_exact_for_terminating_reciprocals() {
        for amount in ["0.5", "1.25", "0.8", "4", "0.00000001"] {
            let rate = usd_eur(amount);
            assert_eq!(rate.invert().unwrap().invert().unwrap(), rate);
        }
    }

    #[test]
    fn test_multiply_composes_through_shared_currency() {
        // GBP -> USD then USD -> EUR
        let gbp_usd = Rate::create("USD", "GBP", "0.75", "2023-10-01")
            .unwrap()
            .invert()
            .unwrap();
        let usd_eur = Rate::create("USD", "EUR", "1.20", "2023-10-01").unwrap();

        let gbp_eur = usd_eur.multiply(&gbp_usd).unwrap();

        assert_eq!(gbp_eur.currency_from(), "GBP");
        assert_eq!(gbp_eur.currency_to(), "EUR");
        // 1.33333333 * 1.2 = 1.599999996, quantized to 1.60000000
        assert_eq!(gbp_eur.rate().value(), dec!(1.60000000));
    }

    #[test]
    fn test_multiply_takes_later_effective_time() {
        let older = Rate::create("EUR", "USD", "1.1", "2023-09-01").unwrap();
        let newer = Rate::create("USD", "JPY", "150", "2023-10-01").unwrap();

        let composed = newer.multiply(&older).unwrap();
        assert_eq!(composed.effective_at(), newer.effective_at());

        let composed = older.multiply(&newer).unwrap();
        assert_eq!(composed.effective_at(), newer.effective_at());
    }

    #[test]
    fn test_multiply_underflow_is_a_result() {
        let tiny = usd_eur("0.00000001");
        let err = tiny.multiply(&tiny).unwrap_err();
        assert_eq!(err.kind(), ValidationKind::Negative);
    }

    #[test]
    fn test_display() {
        let rate = usd_eur("0.85");
        assert_eq!(rate.to_string(), "USD/EUR 0.85000000 @ 2023-10-01T00:00:00+00:00");
    }

    proptest! {
        #[test]
        fn invert_twice_stays_within_quantization_error(units in 1i64..100_000_000_000i64) {
            // amounts from 0.00000001 to 1000
            let rate = usd_eur(&Decimal::new(units, 8).to_string());
            let back = rate.invert().unwrap().invert().unwrap();

            prop_assert_eq!(back.currency_from(), rate.currency_from());
            prop_assert_eq!(back.currency_to(), rate.currency_to());
            prop_assert_eq!(back.effective_at(), rate.effective_at());

            let amount = rate.rate().value();
            let tolerance = amount * amount * dec!(0.00000001) + dec!(0.00000001);
            prop_assert!((back.rate().value() - amount).abs() <= tolerance);
        }
    }
}
