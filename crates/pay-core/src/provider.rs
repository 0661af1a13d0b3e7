//! # Payment Provider Trait
//!
//! The external collaborator every handler delegates to. One trait method
//! per provider operation the gateway consumes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentProvider (trait)                   │
//! │  ├── find_customer_by_email()                               │
//! │  ├── create_customer()                                      │
//! │  ├── create_payment_intent()                                │
//! │  ├── create_subscription()                                  │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │                   │
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │ StripeClient  │   │ test doubles  │
//!          └───────────────┘   └───────────────┘
//! ```

use crate::customer::{Customer, NewCustomer};
use crate::error::PaymentResult;
use crate::payment::{PaymentIntent, PaymentIntentParams};
use crate::subscription::{Subscription, SubscriptionParams};
use async_trait::async_trait;
use std::sync::Arc;

/// Remote payment provider operations.
///
/// Implementations make exactly one remote call per method and never retry.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Look up an existing customer by email.
    ///
    /// Returns the first match, or `None` when the provider has no customer
    /// with that email.
    async fn find_customer_by_email(&self, email: &str) -> PaymentResult<Option<Customer>>;

    /// Create a customer with the payment method attached and set as the
    /// invoice default.
    async fn create_customer(&self, params: &NewCustomer) -> PaymentResult<Customer>;

    /// Create (and, if requested, confirm) a payment intent.
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent>;

    /// Create a subscription, expanding the fields named in `params.expand`.
    async fn create_subscription(&self, params: &SubscriptionParams)
        -> PaymentResult<Subscription>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
