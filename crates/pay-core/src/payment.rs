//! # One-Time Payments
//!
//! Inbound payment request, its validation into provider parameters,
//! and the provider's payment intent object.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, MAX_AMOUNT_MINOR_UNITS};
use crate::settings::PaymentDefaults;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Metadata key carrying the caller's profile reference
pub const PROFILE_ID_METADATA_KEY: &str = "profile_id";

/// Inbound one-time payment request
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in major units (e.g. dollars); server default when absent
    #[serde(default)]
    pub amount: Option<f64>,
    /// ISO currency code; server default when absent
    #[serde(default)]
    pub currency: Option<String>,
    /// Provider payment method token (pm_...)
    pub payment_method_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
}

impl PaymentRequest {
    pub fn new(payment_method_id: impl Into<String>) -> Self {
        Self {
            payment_method_id: payment_method_id.into(),
            ..Default::default()
        }
    }

    /// Builder: set amount in major units
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Builder: set receipt email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder: set profile reference
    pub fn with_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.profile_id = Some(profile_id.into());
        self
    }

    /// Validate the request and build provider parameters.
    ///
    /// Fails with a validation-tier error when the resolved amount is
    /// missing, non-finite, not positive or too large for the provider.
    pub fn into_intent_params(self, defaults: &PaymentDefaults) -> PaymentResult<PaymentIntentParams> {
        let amount = self
            .amount
            .or_else(|| defaults.fallback_amount())
            .ok_or_else(|| PaymentError::InvalidAmount {
                message: "amount is required".to_string(),
            })?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidAmount {
                message: format!("amount must be a positive number, got {}", amount),
            });
        }

        let currency = match self.currency.as_deref() {
            Some(code) => code.parse::<Currency>()?,
            None => defaults.currency,
        };

        let minor_units = currency.to_smallest_unit(amount).ok_or_else(|| {
            PaymentError::InvalidAmount {
                message: format!(
                    "amount {} exceeds the maximum of {} {} minor units",
                    amount, MAX_AMOUNT_MINOR_UNITS, currency
                ),
            }
        })?;
        if minor_units <= 0 {
            return Err(PaymentError::InvalidAmount {
                message: format!("amount {} rounds to zero {}", amount, currency),
            });
        }

        if self.payment_method_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "paymentMethodId is required".to_string(),
            ));
        }

        let receipt_email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| defaults.fallback_receipt_email.clone());

        let mut metadata = BTreeMap::new();
        metadata.insert(
            PROFILE_ID_METADATA_KEY.to_string(),
            self.profile_id.unwrap_or_default(),
        );

        Ok(PaymentIntentParams {
            amount: minor_units,
            currency,
            payment_method_types: defaults.payment_method_types.clone(),
            payment_method_id: self.payment_method_id,
            confirm: true,
            receipt_email,
            error_on_requires_action: true,
            metadata,
        })
    }
}

/// Parameters for the provider's "create payment intent" operation
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentParams {
    /// Amount in smallest currency unit
    pub amount: i64,
    pub currency: Currency,
    pub payment_method_types: Vec<String>,
    pub payment_method_id: String,
    /// Confirm server-side on creation
    pub confirm: bool,
    pub receipt_email: String,
    /// Fail instead of pausing in `requires_action` (e.g. 3D Secure)
    pub error_on_requires_action: bool,
    pub metadata: BTreeMap<String, String>,
}

/// Status of a payment intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A payment intent as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID (pi_...)
    pub id: String,

    #[serde(default)]
    pub amount: i64,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub status: PaymentIntentStatus,

    /// Token for client-side confirmation
    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PaymentDefaults {
        PaymentDefaults::default()
    }

    #[test]
    fn test_default_amount_is_converted() {
        let params = PaymentRequest::new("pm_test")
            .with_email("a@b.com")
            .with_profile_id("p1")
            .into_intent_params(&defaults())
            .unwrap();

        assert_eq!(params.amount, 100_000);
        assert_eq!(params.currency, Currency::USD);
        assert_eq!(params.payment_method_types, vec!["card"]);
        assert_eq!(params.payment_method_id, "pm_test");
        assert!(params.confirm);
        assert!(params.error_on_requires_action);
        assert_eq!(params.receipt_email, "a@b.com");
        assert_eq!(params.metadata.get(PROFILE_ID_METADATA_KEY).unwrap(), "p1");
    }

    #[test]
    fn test_amount_rounded_to_minor_units() {
        let params = PaymentRequest::new("pm_test")
            .with_amount(19.999)
            .into_intent_params(&defaults())
            .unwrap();
        assert_eq!(params.amount, 2000);

        let params = PaymentRequest::new("pm_test")
            .with_amount(10.5)
            .into_intent_params(&defaults())
            .unwrap();
        assert_eq!(params.amount, 1050);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for amount in [0.0, -1.0, -0.01, f64::NAN, f64::INFINITY] {
            let result = PaymentRequest::new("pm_test")
                .with_amount(amount)
                .into_intent_params(&defaults());
            assert!(
                matches!(result, Err(PaymentError::InvalidAmount { .. })),
                "amount {} should be rejected",
                amount
            );
        }
    }

    #[test]
    fn test_rejects_amount_rounding_to_zero() {
        let result = PaymentRequest::new("pm_test")
            .with_amount(0.001)
            .into_intent_params(&defaults());
        assert!(matches!(result, Err(PaymentError::InvalidAmount { .. })));
    }

    #[test]
    fn test_missing_amount_without_default() {
        let defaults = PaymentDefaults {
            default_amount: None,
            ..PaymentDefaults::default()
        };
        let result = PaymentRequest::new("pm_test").into_intent_params(&defaults);
        assert!(matches!(result, Err(PaymentError::InvalidAmount { .. })));
    }

    #[test]
    fn test_required_amount_ignores_default() {
        let defaults = PaymentDefaults {
            require_amount: true,
            ..PaymentDefaults::default()
        };
        let result = PaymentRequest::new("pm_test").into_intent_params(&defaults);
        assert!(matches!(result, Err(PaymentError::InvalidAmount { .. })));

        let params = PaymentRequest::new("pm_test")
            .with_amount(12.5)
            .into_intent_params(&defaults)
            .unwrap();
        assert_eq!(params.amount, 1250);
    }

    #[test]
    fn test_rejects_amount_above_provider_maximum() {
        for amount in [1e300, f64::MAX, 1_000_000.0] {
            let result = PaymentRequest::new("pm_test")
                .with_amount(amount)
                .into_intent_params(&defaults());
            assert!(
                matches!(result, Err(PaymentError::InvalidAmount { .. })),
                "amount {} should be rejected",
                amount
            );
        }

        let params = PaymentRequest::new("pm_test")
            .with_amount(999_999.99)
            .into_intent_params(&defaults())
            .unwrap();
        assert_eq!(params.amount, MAX_AMOUNT_MINOR_UNITS);
    }

    #[test]
    fn test_fallbacks() {
        let params = PaymentRequest::new("pm_test")
            .with_email("  ")
            .into_intent_params(&defaults())
            .unwrap();

        assert_eq!(params.receipt_email, "test@test.com");
        assert_eq!(params.metadata.get(PROFILE_ID_METADATA_KEY).unwrap(), "");
    }

    #[test]
    fn test_currency_override() {
        let mut request = PaymentRequest::new("pm_test").with_amount(500.0);
        request.currency = Some("JPY".to_string());
        let params = request.into_intent_params(&defaults()).unwrap();
        assert_eq!(params.currency, Currency::JPY);
        assert_eq!(params.amount, 500);

        let mut request = PaymentRequest::new("pm_test");
        request.currency = Some("doubloons".to_string());
        assert!(matches!(
            request.into_intent_params(&defaults()),
            Err(PaymentError::UnsupportedCurrency { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_payment_method() {
        let result = PaymentRequest::new(" ").into_intent_params(&defaults());
        assert!(matches!(result, Err(PaymentError::InvalidRequest(_))));
    }

    #[test]
    fn test_deserialize_camel_case_body() {
        let request: PaymentRequest = serde_json::from_str(
            r#"{"paymentMethodId": "pm_test", "email": "a@b.com", "profileId": "p1"}"#,
        )
        .unwrap();
        assert_eq!(request.payment_method_id, "pm_test");
        assert_eq!(request.profile_id.as_deref(), Some("p1"));
        assert!(request.amount.is_none());
    }

    #[test]
    fn test_deserialize_intent_with_unknown_status() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id": "pi_1", "amount": 100, "status": "some_future_state"}"#,
        )
        .unwrap();
        assert_eq!(intent.status, PaymentIntentStatus::Unknown);
        assert!(intent.client_secret.is_none());
    }
}
