//! # Money Types
//!
//! Currency codes and minor-unit conversion.

use crate::error::PaymentError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest amount the provider accepts, in the smallest currency unit
/// (eight digits, e.g. $999,999.99).
pub const MAX_AMOUNT_MINOR_UNITS: i64 = 99_999_999;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code, lowercased as the provider expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Convert a major-unit amount to the smallest currency unit (cents, etc.),
    /// rounding to the nearest integer.
    ///
    /// Returns `None` when the rounded value is not finite or its magnitude
    /// exceeds [`MAX_AMOUNT_MINOR_UNITS`].
    pub fn to_smallest_unit(&self, amount: f64) -> Option<i64> {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        let scaled = (amount * multiplier).round();
        if !scaled.is_finite() || scaled.abs() > MAX_AMOUNT_MINOR_UNITS as f64 {
            return None;
        }
        Some(scaled as i64)
    }
}

impl FromStr for Currency {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            "chf" => Ok(Currency::CHF),
            "mxn" => Ok(Currency::MXN),
            _ => Err(PaymentError::UnsupportedCurrency {
                currency: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        let usd = Currency::USD;
        assert_eq!(usd.to_smallest_unit(10.99), Some(1099));
        assert_eq!(usd.to_smallest_unit(1000.0), Some(100_000));

        let jpy = Currency::JPY;
        assert_eq!(jpy.to_smallest_unit(1000.0), Some(1000));
    }

    #[test]
    fn test_rounds_to_nearest_cent() {
        assert_eq!(Currency::USD.to_smallest_unit(19.999), Some(2000));
        assert_eq!(Currency::USD.to_smallest_unit(0.004), Some(0));
        assert_eq!(Currency::EUR.to_smallest_unit(0.125), Some(13));
    }

    #[test]
    fn test_out_of_range_amounts() {
        assert_eq!(
            Currency::USD.to_smallest_unit(999_999.99),
            Some(MAX_AMOUNT_MINOR_UNITS)
        );
        assert_eq!(Currency::USD.to_smallest_unit(1_000_000.0), None);
        assert_eq!(Currency::USD.to_smallest_unit(1e300), None);
        assert_eq!(
            Currency::JPY.to_smallest_unit(99_999_999.0),
            Some(MAX_AMOUNT_MINOR_UNITS)
        );
        assert_eq!(Currency::JPY.to_smallest_unit(1e8), None);
        assert_eq!(Currency::USD.to_smallest_unit(f64::INFINITY), None);
    }

    #[test]
    fn test_default_currency() {
        assert_eq!(Currency::default(), Currency::USD);
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::EUR);
        assert!(matches!(
            "xyz".parse::<Currency>(),
            Err(PaymentError::UnsupportedCurrency { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Currency::GBP.to_string(), "GBP");
    }
}
