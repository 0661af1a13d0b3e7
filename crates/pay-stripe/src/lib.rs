//! # pay-stripe
//!
//! Stripe provider for stripe-gateway.
//!
//! [`StripeClient`] implements [`pay_core::PaymentProvider`] over the Stripe
//! REST API:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `find_customer_by_email` | `GET /v1/customers?email=...&limit=1` |
//! | `create_customer` | `POST /v1/customers` |
//! | `create_payment_intent` | `POST /v1/payment_intents` |
//! | `create_subscription` | `POST /v1/subscriptions` |
//!
//! Requests are pinned to API version `2024-11-20.acacia`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeClient;
//! use pay_core::{PaymentProvider, PaymentRequest, GatewaySettings};
//!
//! // Create client from environment
//! let stripe = StripeClient::from_env()?;
//!
//! let params = PaymentRequest::new("pm_card_visa")
//!     .into_intent_params(&GatewaySettings::default().payment)?;
//!
//! let intent = stripe.create_payment_intent(&params).await?;
//! ```

pub mod client;
pub mod config;
pub mod form;

// Re-exports
pub use client::StripeClient;
pub use config::{StripeConfig, API_VERSION, DEFAULT_API_BASE_URL};
