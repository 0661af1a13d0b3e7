//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//!
//! Every handler follows the same shape: parse and validate the body
//! (failures → 400, no provider call), delegate to the provider, then map
//! the outcome. Provider-side failures are logged in full and answered with
//! a generic 500.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pay_core::{
    Customer, CustomerRecord, NewCustomer, PaymentError, PaymentRequest, PaymentResult,
    SubscriptionParams, SubscriptionRequest, SubscriptionResult, PROFILE_ID_METADATA_KEY,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

pub const PAYMENT_CREATED: &str = "Payment intent created successfully";
pub const PAYMENT_FAILED: &str = "Failed to create payment intent";
pub const INVALID_AMOUNT: &str = "Invalid amount provided";
pub const SUBSCRIPTION_FAILED: &str = "Failed to create subscription";
pub const CUSTOMER_EXISTS: &str = "Customer already exists";
pub const CUSTOMER_CREATED: &str = "Customer created successfully";
pub const SAVE_CARD_FAILED: &str = "Failed to save payment method";
pub const INVALID_BODY: &str = "Invalid request body";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Save card request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCardRequest {
    /// Payment method token (pm_...)
    pub payment_method_id: String,
}

/// Success response with a human-readable message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Local validation failure: 400 with a specific message
fn validation_failure(err: PaymentError) -> ApiError {
    warn!("Request rejected: {}", err);
    let message = match err {
        PaymentError::InvalidAmount { .. } => INVALID_AMOUNT.to_string(),
        other => other.to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Provider/integration failure: details to the log, generic 500 to the caller
fn provider_failure(err: PaymentError, message: &str) -> ApiError {
    error!("{}: {}", message, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(INVALID_BODY)),
        )
    })
}

/// Look the email up at the provider, creating the customer on first sight.
///
/// Returns the customer and whether it was just created. Not atomic: two
/// concurrent calls for a new email can both create a customer.
async fn find_or_create_customer(
    state: &AppState,
    new_customer: &NewCustomer,
) -> PaymentResult<(Customer, bool)> {
    if let Some(existing) = state
        .provider
        .find_customer_by_email(&new_customer.email)
        .await?
    {
        debug!("Found existing customer: {}", existing.id);
        return Ok((existing, false));
    }

    let created = state.provider.create_customer(new_customer).await?;
    Ok((created, true))
}

/// Record the email → customer mapping in the local cache
fn remember_customer(state: &AppState, record: CustomerRecord) {
    if let Some(previous) = state.customers.put(record) {
        debug!(
            "Replaced cached customer for {} (cus={}, pm={}, cached at {})",
            previous.email, previous.customer_id, previous.payment_method_id, previous.cached_at
        );
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "stripe-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.payment_mode().as_str(),
    }))
}

/// Create and confirm a one-time payment intent
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = read_body(payload)?;

    let params = request
        .into_intent_params(&state.settings.payment)
        .map_err(validation_failure)?;

    info!(
        "Creating payment intent: amount={} {}",
        params.amount, params.currency
    );

    let intent = state
        .provider
        .create_payment_intent(&params)
        .await
        .map_err(|e| provider_failure(e, PAYMENT_FAILED))?;

    // Intent details stay server-side
    info!(
        "Payment intent created: id={}, status={:?}",
        intent.id, intent.status
    );
    debug!("{:#?}", intent);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(PAYMENT_CREATED)),
    ))
}

/// Create a subscription for the caller's email and return the first
/// payment's client secret
#[instrument(skip(state, payload))]
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscriptionResult>, ApiError> {
    let request = read_body(payload)?
        .normalized()
        .map_err(validation_failure)?;

    let price_id = state
        .settings
        .price_id()
        .map_err(|e| provider_failure(e, SUBSCRIPTION_FAILED))?;

    let mut new_customer = NewCustomer::new(&request.email, &request.payment_method_id);
    if let Some(ref name) = request.name {
        new_customer = new_customer.with_name(name);
    }

    let (customer, created) = find_or_create_customer(&state, &new_customer)
        .await
        .map_err(|e| provider_failure(e, SUBSCRIPTION_FAILED))?;

    if created {
        info!("Created customer for subscription: {}", customer.id);
    }

    remember_customer(
        &state,
        CustomerRecord::new(&request.email, &customer.id, &request.payment_method_id),
    );

    let params = SubscriptionParams::incomplete_card_subscription(&customer.id, price_id)
        .with_metadata(
            PROFILE_ID_METADATA_KEY,
            request.profile_id.clone().unwrap_or_default(),
        );

    let subscription = state
        .provider
        .create_subscription(&params)
        .await
        .map_err(|e| provider_failure(e, SUBSCRIPTION_FAILED))?;

    info!(
        "Subscription created: id={}, status={:?}",
        subscription.id, subscription.status
    );

    let result = subscription
        .confirmation()
        .map_err(|e| provider_failure(e, SUBSCRIPTION_FAILED))?;

    Ok(Json(result))
}

/// Register the configured customer identity with a payment method
#[instrument(skip(state, payload))]
pub async fn save_card(
    State(state): State<AppState>,
    payload: Result<Json<SaveCardRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = read_body(payload)?;

    if request.payment_method_id.trim().is_empty() {
        return Err(validation_failure(PaymentError::InvalidRequest(
            "paymentMethodId is required".to_string(),
        )));
    }

    let identity = &state.settings.save_card;
    let new_customer = NewCustomer::new(&identity.email, &request.payment_method_id)
        .with_name(&identity.customer_name);

    let (customer, created) = find_or_create_customer(&state, &new_customer)
        .await
        .map_err(|e| provider_failure(e, SAVE_CARD_FAILED))?;

    remember_customer(
        &state,
        CustomerRecord::new(&identity.email, &customer.id, &request.payment_method_id),
    );

    let message = if created {
        info!("Customer created: {}", customer.id);
        CUSTOMER_CREATED
    } else {
        info!("Customer already exists: {}", customer.id);
        CUSTOMER_EXISTS
    };

    Ok(Json(MessageResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error");
        assert_eq!(err.error, "Test error");
    }

    #[test]
    fn test_invalid_amount_message() {
        let (status, Json(body)) = validation_failure(PaymentError::InvalidAmount {
            message: "amount must be a positive number, got -1".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, INVALID_AMOUNT);
    }

    #[test]
    fn test_provider_failure_is_generic() {
        let (status, Json(body)) = provider_failure(
            PaymentError::PaymentDeclined {
                reason: "insufficient_funds".to_string(),
            },
            PAYMENT_FAILED,
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, PAYMENT_FAILED);
    }
}
