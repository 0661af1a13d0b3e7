//! # stripe-gateway
//!
//! Thin HTTP facade over the Stripe API.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export PAYMENT_MODE=one_time          # or: subscription
//! export STRIPE_PRICE_ID=price_...      # required for subscription mode
//!
//! # Run the server
//! stripe-gateway
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;

    info!(
        "stripe-gateway v{} ({})",
        env!("CARGO_PKG_VERSION"),
        state.config.environment
    );
    info!("Payment mode: {}", state.payment_mode());
    info!("Payment provider: {}", state.provider.provider_name());

    let is_prod = state.config.is_production();
    let app = routes::create_router(state);

    info!("Listening on http://{}", addr);

    if !is_prod {
        info!("Payment: POST http://{}/api/stripe/payment", addr);
        info!("Save card: POST http://{}/api/stripe/save-card", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
