//! Conversion result type and amount parsing.

use fintrack_common::{CurrencyCode, CurrencyPair, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FxError, FxResult};

/// Represents a completed currency conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    /// Rate applied, as reported by the provider.
    pub rate: Decimal,
    /// Completion time in milliseconds since the Unix epoch.
    pub timestamp: Timestamp,
}

impl ConversionResult {
    /// Build a result by applying `rate` to `from_amount`.
    ///
    /// No rounding is applied beyond the precision the rate carries. Fails
    /// with [`FxError::AmountOverflow`] when the product is not representable.
    pub fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        from_amount: Decimal,
        rate: Decimal,
        timestamp: Timestamp,
    ) -> FxResult<Self> {
        let to_amount = from_amount.checked_mul(rate).ok_or_else(|| {
            FxError::AmountOverflow(format!("{from_amount} {from_currency} at rate {rate}"))
        })?;

        Ok(Self {
            from_currency,
            to_currency,
            from_amount,
            to_amount,
            rate,
            timestamp,
        })
    }

    /// Get the ordered currency pair.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from_currency.clone(), self.to_currency.clone())
    }

    /// Check if this result converts along the same ordered pair as `other`.
    pub fn same_pair(&self, other: &ConversionResult) -> bool {
        self.from_currency == other.from_currency && self.to_currency == other.to_currency
    }

    /// Output amount rounded to the target currency's standard places.
    pub fn display_amount(&self) -> Decimal {
        self.to_amount.round_dp(self.to_currency.decimal_places())
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {} {} (rate {})",
            self.from_amount,
            self.from_currency,
            self.display_amount(),
            self.to_currency,
            self.rate
        )
    }
}

/// Parse a user-entered amount. Only positive numbers are accepted.
pub fn parse_amount(input: &str) -> FxResult<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FxError::InvalidAmount("amount is empty".to_string()));
    }

    let amount = Decimal::from_str(trimmed)
        .map_err(|e| FxError::InvalidAmount(format!("{trimmed}: {e}")))?;

    if amount <= Decimal::ZERO {
        return Err(FxError::InvalidAmount(format!(
            "{trimmed}: amount must be positive"
        )));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_result_applies_rate_exactly() {
        let result = ConversionResult::new(
            CurrencyCode::usd(),
            CurrencyCode::eur(),
            dec!(100),
            dec!(0.850000),
            1_700_000_000_000,
        )
        .unwrap();

        assert_eq!(result.to_amount, dec!(85));
        assert_eq!(result.to_amount.to_string(), "85.000000");
        assert_eq!(result.pair().to_string(), "USD/EUR");
    }

    #[test]
    fn test_same_pair_is_ordered() {
        let ab = ConversionResult::new("USD".into(), "EUR".into(), dec!(1), dec!(0.85), 0).unwrap();
        let ab2 = ConversionResult::new("USD".into(), "EUR".into(), dec!(5), dec!(0.86), 1).unwrap();
        let ba = ConversionResult::new("EUR".into(), "USD".into(), dec!(1), dec!(1.18), 2).unwrap();

        assert!(ab.same_pair(&ab2));
        assert!(!ab.same_pair(&ba));
    }

    #[test]
    fn test_display() {
        let result = ConversionResult::new(
            CurrencyCode::usd(),
            CurrencyCode::jpy(),
            dec!(12.5),
            dec!(110.123456),
            0,
        )
        .unwrap();

        assert_eq!(result.to_string(), "12.5 USD = 1377 JPY (rate 110.123456)");
    }

    #[test]
    fn test_unrepresentable_product_is_an_error() {
        let result = ConversionResult::new(
            CurrencyCode::usd(),
            CurrencyCode::jpy(),
            Decimal::MAX,
            dec!(110.000000),
            0,
        );

        assert!(matches!(result, Err(FxError::AmountOverflow(_))));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 100.50 ").unwrap(), dec!(100.50));
        assert_eq!(parse_amount("0.01").unwrap(), dec!(0.01));

        assert!(matches!(parse_amount(""), Err(FxError::InvalidAmount(_))));
        assert!(matches!(parse_amount("abc"), Err(FxError::InvalidAmount(_))));
        assert!(matches!(parse_amount("0"), Err(FxError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-5"), Err(FxError::InvalidAmount(_))));
    }
}
