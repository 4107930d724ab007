//! ISO 4217 currency reference: numeric code to decimal exponent.

use std::collections::HashMap;

use lazy_static::lazy_static;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;

lazy_static! {
    static ref CURRENCY_EXPONENTS: HashMap<u16, u32> = {
        let codes: &[(u16, u32)] = &[
            (36, 2),  // AUD
            (124, 2), // CAD
            (156, 2), // CNY
            (203, 2), // CZK
            (208, 2), // DKK
            (348, 2), // HUF
            (352, 0), // ISK
            (392, 0), // JPY
            (414, 3), // KWD
            (578, 2), // NOK
            (643, 2), // RUB
            (752, 2), // SEK
            (756, 2), // CHF
            (788, 3), // TND
            (826, 2), // GBP
            (840, 2), // USD
            (933, 2), // BYN
            (941, 2), // RSD
            (946, 2), // RON
            (975, 2), // BGN
            (978, 2), // EUR
            (980, 2), // UAH
            (985, 2), // PLN
        ];
        codes.iter().copied().collect()
    };
}

pub fn is_supported(code: u16) -> bool {
    CURRENCY_EXPONENTS.contains_key(&code)
}

pub fn exponent(code: u16) -> Result<u32, ValidationError> {
    CURRENCY_EXPONENTS
        .get(&code)
        .copied()
        .ok_or(ValidationError::UnknownCurrency(code))
}

/// Converts a decimal price into the integer minor-unit amount:
/// `round(price * 10^exponent)`, midpoint rounding away from zero.
pub fn minor_amount(price: Decimal, code: u16) -> Result<u64, ValidationError> {
    let exp = exponent(code)?;
    let scaled = price
        .checked_mul(Decimal::from(10u64.pow(exp)))
        .ok_or_else(|| ValidationError::InvalidAmount(price.to_string()))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    scaled
        .to_u64()
        .ok_or_else(|| ValidationError::InvalidAmount(price.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn eur_has_two_decimal_places() {
        assert_eq!(exponent(978).unwrap(), 2);
        assert_eq!(minor_amount(dec!(4.56), 978).unwrap(), 456);
    }

    #[test]
    fn zero_exponent_currency_keeps_major_units() {
        assert_eq!(minor_amount(dec!(1200), 392).unwrap(), 1200);
        assert_eq!(minor_amount(dec!(1200.4), 392).unwrap(), 1200);
    }

    #[test]
    fn three_exponent_currency() {
        assert_eq!(minor_amount(dec!(1.2345), 414).unwrap(), 1235);
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        assert_eq!(minor_amount(dec!(0.125), 978).unwrap(), 13);
        assert_eq!(minor_amount(dec!(0.135), 978).unwrap(), 14);
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(!is_supported(999));
        assert!(matches!(
            minor_amount(dec!(1), 999),
            Err(ValidationError::UnknownCurrency(999))
        ));
    }

    #[test]
    fn negative_price_cannot_become_minor_units() {
        assert!(matches!(
            minor_amount(dec!(-4.56), 978),
            Err(ValidationError::InvalidAmount(_))
        ));
    }
}
