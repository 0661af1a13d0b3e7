//! # pay-api
//!
//! HTTP API layer for stripe-gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Payment, subscription and save-card endpoints delegating to Stripe
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/stripe/payment` | Payment intent (or subscription, per `payment_mode`) |
//! | POST | `/api/stripe/save-card` | Register customer with a saved card |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
