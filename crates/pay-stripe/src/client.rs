//! # Stripe REST Client
//!
//! `PaymentProvider` implementation over the Stripe REST API.
//! One HTTP call per operation, no retries.

use crate::config::StripeConfig;
use crate::form::{customer_form, payment_intent_form, subscription_form, FormParams};
use async_trait::async_trait;
use pay_core::{
    Customer, NewCustomer, PaymentError, PaymentIntent, PaymentIntentParams, PaymentProvider,
    PaymentResult, Subscription, SubscriptionParams,
};
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe API client
pub struct StripeClient {
    config: StripeConfig,
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// POST a form body. Every call gets a fresh idempotency key.
    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &FormParams) -> PaymentResult<T> {
        let idempotency_key = Uuid::new_v4().to_string();

        debug!("POST {} ({} fields)", path, form.len());

        let response = self
            .client
            .post(self.config.endpoint(path))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        Self::read_response(response).await
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> PaymentResult<T> {
        debug!("GET {}", path);

        let response = self
            .client
            .get(self.config.endpoint(path))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .query(query)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        Self::read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(response: Response) -> PaymentResult<T> {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);
            return Err(map_api_error(status, retry_after, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[instrument(skip(self, email))]
    async fn find_customer_by_email(&self, email: &str) -> PaymentResult<Option<Customer>> {
        let list: StripeList<Customer> = self
            .get_query("/v1/customers", &[("email", email), ("limit", "1")])
            .await?;

        let customer = list.data.into_iter().next();
        debug!("Customer lookup: found={}", customer.is_some());
        Ok(customer)
    }

    #[instrument(skip(self, params))]
    async fn create_customer(&self, params: &NewCustomer) -> PaymentResult<Customer> {
        let customer: Customer = self
            .post_form("/v1/customers", &customer_form(params))
            .await?;

        info!("Created Stripe customer: id={}", customer.id);
        Ok(customer)
    }

    #[instrument(skip(self, params), fields(amount = params.amount, currency = %params.currency))]
    async fn create_payment_intent(
        &self,
        params: &PaymentIntentParams,
    ) -> PaymentResult<PaymentIntent> {
        let intent: PaymentIntent = self
            .post_form("/v1/payment_intents", &payment_intent_form(params))
            .await?;

        info!(
            "Created Stripe payment intent: id={}, status={:?}",
            intent.id, intent.status
        );
        Ok(intent)
    }

    #[instrument(skip(self, params), fields(customer = %params.customer_id, price = %params.price_id))]
    async fn create_subscription(
        &self,
        params: &SubscriptionParams,
    ) -> PaymentResult<Subscription> {
        let subscription: Subscription = self
            .post_form("/v1/subscriptions", &subscription_form(params))
            .await?;

        info!(
            "Created Stripe subscription: id={}, status={:?}",
            subscription.id, subscription.status
        );
        Ok(subscription)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Map a non-2xx Stripe response to a `PaymentError`
fn map_api_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> PaymentError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return PaymentError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after_secs: retry_after.unwrap_or(1),
        };
    }

    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(StripeErrorResponse { error }) if error.error_type == "card_error" => {
            PaymentError::PaymentDeclined {
                reason: error
                    .decline_code
                    .or(error.code)
                    .unwrap_or(error.message),
            }
        }
        Ok(StripeErrorResponse { error }) => PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: error.message,
            code: error.code,
        },
        Err(_) => PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: format!("HTTP {}: {}", status, body),
            code: None,
        },
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(rename = "type", default)]
    error_type: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    decline_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_error_maps_to_declined() {
        let body = r#"{"error": {"type": "card_error", "code": "card_declined",
            "decline_code": "insufficient_funds", "message": "Your card has insufficient funds."}}"#;

        let err = map_api_error(StatusCode::PAYMENT_REQUIRED, None, body);
        assert!(matches!(
            err,
            PaymentError::PaymentDeclined { ref reason } if reason == "insufficient_funds"
        ));
    }

    #[test]
    fn test_invalid_request_maps_to_provider_error() {
        let body = r#"{"error": {"type": "invalid_request_error", "code": "resource_missing",
            "message": "No such PaymentMethod: 'pm_nope'"}}"#;

        match map_api_error(StatusCode::BAD_REQUEST, None, body) {
            PaymentError::ProviderError { provider, message, code } => {
                assert_eq!(provider, "stripe");
                assert!(message.contains("pm_nope"));
                assert_eq!(code.as_deref(), Some("resource_missing"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit() {
        let err = map_api_error(StatusCode::TOO_MANY_REQUESTS, Some(7), "");
        assert!(matches!(
            err,
            PaymentError::RateLimited { retry_after_secs: 7, .. }
        ));

        let err = map_api_error(StatusCode::TOO_MANY_REQUESTS, None, "");
        assert!(matches!(
            err,
            PaymentError::RateLimited { retry_after_secs: 1, .. }
        ));
    }

    #[test]
    fn test_unparseable_error_body() {
        let err = map_api_error(StatusCode::BAD_GATEWAY, None, "<html>upstream</html>");
        match err {
            PaymentError::ProviderError { message, code, .. } => {
                assert!(message.starts_with("HTTP 502"));
                assert!(code.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
