//! # Subscriptions
//!
//! Inbound subscription request, provider parameters, and the provider's
//! subscription/invoice objects.
//!
//! A subscription is created in `default_incomplete` mode: the first
//! invoice's payment intent is left for the client to confirm, so the
//! handler must hand its client secret back. That secret is only reachable
//! when the provider expanded both `latest_invoice` and
//! `latest_invoice.payment_intent`.

use crate::customer::Customer;
use crate::error::{PaymentError, PaymentResult};
use crate::expandable::Expandable;
use crate::payment::PaymentIntent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Expansion path requested on subscription creation
pub const EXPAND_LATEST_INVOICE_PAYMENT_INTENT: &str = "latest_invoice.payment_intent";

/// Inbound subscription request
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub payment_method_id: String,
    #[serde(default)]
    pub profile_id: Option<String>,
}

impl SubscriptionRequest {
    /// Trim identifying fields and check they are present before any
    /// provider call. The trimmed email is the provider lookup and cache key.
    pub fn normalized(mut self) -> PaymentResult<Self> {
        self.email = self.email.trim().to_string();
        self.payment_method_id = self.payment_method_id.trim().to_string();

        if self.email.is_empty() {
            return Err(PaymentError::InvalidRequest("email is required".to_string()));
        }
        if self.payment_method_id.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "paymentMethodId is required".to_string(),
            ));
        }
        Ok(self)
    }
}

/// What the provider does when the first payment cannot complete immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentBehavior {
    /// Leave the subscription `incomplete` until the client confirms
    DefaultIncomplete,
    AllowIncomplete,
    ErrorIfIncomplete,
}

impl PaymentBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentBehavior::DefaultIncomplete => "default_incomplete",
            PaymentBehavior::AllowIncomplete => "allow_incomplete",
            PaymentBehavior::ErrorIfIncomplete => "error_if_incomplete",
        }
    }
}

/// Parameters for the provider's "create subscription" operation
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionParams {
    pub customer_id: String,
    pub price_id: String,
    pub payment_behavior: PaymentBehavior,
    /// Charge the default payment method automatically on each invoice
    pub charge_automatically: bool,
    pub payment_method_types: Vec<String>,
    /// Persist the payment method used as the subscription default
    pub save_default_payment_method: bool,
    pub expand: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl SubscriptionParams {
    /// Card-only, client-confirmed subscription with the first invoice's
    /// payment intent expanded inline.
    pub fn incomplete_card_subscription(
        customer_id: impl Into<String>,
        price_id: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            price_id: price_id.into(),
            payment_behavior: PaymentBehavior::DefaultIncomplete,
            charge_automatically: true,
            payment_method_types: vec!["card".to_string()],
            save_default_payment_method: true,
            expand: vec![EXPAND_LATEST_INVOICE_PAYMENT_INTENT.to_string()],
            metadata: BTreeMap::new(),
        }
    }

    /// Builder: add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Subscription status as reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Incomplete,
    IncompleteExpired,
    Trialing,
    Active,
    PastDue,
    Canceled,
    Unpaid,
    Paused,
    #[default]
    #[serde(other)]
    Unknown,
}

/// An invoice as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,

    #[serde(default)]
    pub payment_intent: Option<Expandable<PaymentIntent>>,
}

/// A subscription as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Provider's subscription ID (sub_...)
    pub id: String,

    #[serde(default)]
    pub status: SubscriptionStatus,

    #[serde(default)]
    pub customer: Option<Expandable<Customer>>,

    #[serde(default)]
    pub latest_invoice: Option<Expandable<Invoice>>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Subscription {
    /// Extract what the client needs to confirm the first payment.
    ///
    /// Fails unless the invoice and its payment intent were both expanded
    /// and the intent carries a client secret.
    pub fn confirmation(&self) -> PaymentResult<SubscriptionResult> {
        let invoice = self
            .latest_invoice
            .as_ref()
            .ok_or_else(|| {
                PaymentError::IncompleteResponse(format!(
                    "subscription {} has no latest_invoice",
                    self.id
                ))
            })?
            .expanded("latest_invoice")?;

        let intent = invoice
            .payment_intent
            .as_ref()
            .ok_or_else(|| {
                PaymentError::IncompleteResponse(format!(
                    "invoice {} has no payment_intent",
                    invoice.id
                ))
            })?
            .expanded(EXPAND_LATEST_INVOICE_PAYMENT_INTENT)?;

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            PaymentError::IncompleteResponse(format!(
                "payment intent {} has no client_secret",
                intent.id
            ))
        })?;

        Ok(SubscriptionResult {
            subscription_id: self.id.clone(),
            client_secret,
        })
    }
}

/// Returned to the client after a subscription is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResult {
    pub subscription_id: String,
    pub client_secret: String,
}
