//! # pay-core
//!
//! Core types and traits for the stripe-gateway payment facade.
//!
//! This crate provides:
//! - `PaymentProvider` trait for the remote payment API
//! - `PaymentRequest` validation into `PaymentIntentParams`
//! - `SubscriptionRequest`, `Subscription` and the expansion check
//! - `Expandable<T>` for reference-or-object response fields
//! - `CustomerStore` for the best-effort email → customer cache
//! - `GatewaySettings` for server-side defaults
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{GatewaySettings, PaymentProvider, PaymentRequest};
//!
//! let settings = GatewaySettings::default();
//!
//! // Validate before touching the provider
//! let params = PaymentRequest::new("pm_card_visa")
//!     .with_email("a@b.com")
//!     .into_intent_params(&settings.payment)?;
//!
//! let intent = provider.create_payment_intent(&params).await?;
//! ```

pub mod customer;
pub mod error;
pub mod expandable;
pub mod money;
pub mod payment;
pub mod provider;
pub mod settings;
pub mod subscription;

// Re-exports for convenience
pub use customer::{
    Customer, CustomerRecord, CustomerStore, InMemoryCustomerStore, NewCustomer,
    SharedCustomerStore,
};
pub use error::{PaymentError, PaymentResult};
pub use expandable::Expandable;
pub use money::{Currency, MAX_AMOUNT_MINOR_UNITS};
pub use payment::{
    PaymentIntent, PaymentIntentParams, PaymentIntentStatus, PaymentRequest,
    PROFILE_ID_METADATA_KEY,
};
pub use provider::{BoxedPaymentProvider, PaymentProvider};
pub use settings::{
    GatewaySettings, PaymentDefaults, PaymentMode, SaveCardDefaults, SubscriptionDefaults,
};
pub use subscription::{
    Invoice, PaymentBehavior, Subscription, SubscriptionParams, SubscriptionRequest,
    SubscriptionResult, SubscriptionStatus, EXPAND_LATEST_INVOICE_PAYMENT_INTENT,
};
