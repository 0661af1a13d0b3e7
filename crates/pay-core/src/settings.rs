//! # Gateway Settings
//!
//! Server-side values the handlers fill in for the caller: default amount,
//! currency, fallback receipt email, subscription price and the save-card
//! identity. Loaded from `config/gateway.toml`; every field has a default.
//!
//! ```toml
//! payment_mode = "one_time"
//!
//! [payment]
//! default_amount = 1000.0
//! require_amount = false
//! currency = "usd"
//! payment_method_types = ["card"]
//! fallback_receipt_email = "test@test.com"
//!
//! [subscription]
//! price_id = "price_123"
//!
//! [save_card]
//! email = "test@test.com"
//! customer_name = "Test Customer"
//! ```

use crate::error::PaymentError;
use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which implementation serves `POST /api/stripe/payment`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Server-confirmed one-time payment intent
    #[default]
    OneTime,
    /// Subscription with client-side confirmation
    Subscription,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::OneTime => "one_time",
            PaymentMode::Subscription => "subscription",
        }
    }
}

impl FromStr for PaymentMode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one_time" | "one-time" | "payment" => Ok(PaymentMode::OneTime),
            "subscription" => Ok(PaymentMode::Subscription),
            other => Err(PaymentError::Configuration(format!(
                "Unknown payment mode: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defaults for one-time payment intents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentDefaults {
    /// Amount in major units used when the request carries none.
    /// `None` makes the amount mandatory.
    pub default_amount: Option<f64>,
    /// Reject requests without an amount even when `default_amount` is set
    pub require_amount: bool,
    pub currency: Currency,
    pub payment_method_types: Vec<String>,
    pub fallback_receipt_email: String,
}

impl Default for PaymentDefaults {
    fn default() -> Self {
        Self {
            default_amount: Some(1000.0),
            require_amount: false,
            currency: Currency::USD,
            payment_method_types: vec!["card".to_string()],
            fallback_receipt_email: "test@test.com".to_string(),
        }
    }
}

impl PaymentDefaults {
    /// Amount to charge when the request omits one
    pub fn fallback_amount(&self) -> Option<f64> {
        if self.require_amount {
            None
        } else {
            self.default_amount
        }
    }
}

/// Subscription settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionDefaults {
    /// Provider price id every subscription is created against
    pub price_id: Option<String>,
}

/// Identity used by the save-card endpoint.
///
/// Not per caller: every save-card request registers against this one email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveCardDefaults {
    pub email: String,
    pub customer_name: String,
}

impl Default for SaveCardDefaults {
    fn default() -> Self {
        Self {
            email: "test@test.com".to_string(),
            customer_name: "Test Customer".to_string(),
        }
    }
}

/// All gateway settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub payment_mode: PaymentMode,
    pub payment: PaymentDefaults,
    pub subscription: SubscriptionDefaults,
    pub save_card: SaveCardDefaults,
}

impl GatewaySettings {
    /// Load settings from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Builder: set payment mode
    pub fn with_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = mode;
        self
    }

    /// Builder: set subscription price id
    pub fn with_price_id(mut self, price_id: impl Into<String>) -> Self {
        self.subscription.price_id = Some(price_id.into());
        self
    }

    /// Check the settings are usable for the selected mode
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.payment.payment_method_types.is_empty() {
            return Err(PaymentError::Configuration(
                "payment.payment_method_types must not be empty".to_string(),
            ));
        }

        if self.payment_mode == PaymentMode::Subscription
            && self
                .subscription
                .price_id
                .as_deref()
                .map_or(true, str::is_empty)
        {
            return Err(PaymentError::Configuration(
                "subscription mode requires subscription.price_id (or STRIPE_PRICE_ID)"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Configured subscription price id
    pub fn price_id(&self) -> Result<&str, PaymentError> {
        self.subscription
            .price_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PaymentError::Configuration("No subscription price configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GatewaySettings::default();
        assert_eq!(settings.payment_mode, PaymentMode::OneTime);
        assert_eq!(settings.payment.default_amount, Some(1000.0));
        assert_eq!(settings.payment.currency, Currency::USD);
        assert_eq!(settings.payment.payment_method_types, vec!["card"]);
        assert_eq!(settings.save_card.email, "test@test.com");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = GatewaySettings::from_toml(
            r#"
            payment_mode = "subscription"

            [payment]
            currency = "eur"

            [subscription]
            price_id = "price_123"
            "#,
        )
        .unwrap();

        assert_eq!(settings.payment_mode, PaymentMode::Subscription);
        assert_eq!(settings.payment.currency, Currency::EUR);
        // Untouched fields keep their defaults
        assert_eq!(settings.payment.default_amount, Some(1000.0));
        assert_eq!(settings.price_id().unwrap(), "price_123");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_toml_require_amount() {
        let settings = GatewaySettings::from_toml(
            r#"
            [payment]
            require_amount = true
            "#,
        )
        .unwrap();

        assert!(settings.payment.require_amount);
        assert_eq!(settings.payment.fallback_amount(), None);

        let settings = GatewaySettings::from_toml("[payment]\ncurrency = \"usd\"\n").unwrap();
        assert!(!settings.payment.require_amount);
        assert_eq!(settings.payment.fallback_amount(), Some(1000.0));
    }

    #[test]
    fn test_subscription_mode_requires_price() {
        let settings = GatewaySettings::default().with_mode(PaymentMode::Subscription);
        assert!(matches!(
            settings.validate(),
            Err(PaymentError::Configuration(_))
        ));

        let settings = settings.with_price_id("price_abc");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("one_time".parse::<PaymentMode>().unwrap(), PaymentMode::OneTime);
        assert_eq!(
            "Subscription".parse::<PaymentMode>().unwrap(),
            PaymentMode::Subscription
        );
        assert!("weekly".parse::<PaymentMode>().is_err());
    }
}
