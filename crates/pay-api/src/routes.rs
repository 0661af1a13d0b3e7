//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use pay_core::PaymentMode;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health, / - Health check
/// - POST /api/stripe/payment - One-time payment intent, or subscription
///   when `payment_mode = "subscription"` (never both)
/// - POST /api/stripe/save-card - Register the save-card customer
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_route = match state.payment_mode() {
        PaymentMode::OneTime => post(handlers::create_payment_intent),
        PaymentMode::Subscription => post(handlers::create_subscription),
    };

    let stripe_routes = Router::new()
        .route("/payment", payment_route)
        .route("/save-card", post(handlers::save_card));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Stripe-backed API
        .nest("/api/stripe", stripe_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
