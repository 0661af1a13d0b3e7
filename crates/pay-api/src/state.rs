//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment provider, customer cache, gateway settings and
//! process configuration.

use pay_core::{
    BoxedPaymentProvider, GatewaySettings, InMemoryCustomerStore, PaymentMode,
    SharedCustomerStore,
};
use pay_stripe::StripeClient;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Remote payment provider
    pub provider: BoxedPaymentProvider,
    /// Best-effort email → customer cache
    pub customers: SharedCustomerStore,
    /// Server-side defaults
    pub settings: Arc<GatewaySettings>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let settings = load_gateway_settings()?;

        let stripe = StripeClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        tracing::info!("Stripe client ready: {:?}", stripe.config());

        Ok(Self::with_provider(
            config,
            settings,
            Arc::new(stripe),
            InMemoryCustomerStore::shared(),
        ))
    }

    /// Assemble state from explicit parts
    pub fn with_provider(
        config: AppConfig,
        settings: GatewaySettings,
        provider: BoxedPaymentProvider,
        customers: SharedCustomerStore,
    ) -> Self {
        Self {
            provider,
            customers,
            settings: Arc::new(settings),
            config,
        }
    }

    /// Which implementation serves the payment endpoint
    pub fn payment_mode(&self) -> PaymentMode {
        self.settings.payment_mode
    }
}

/// Load gateway settings from config file, then apply env overrides
fn load_gateway_settings() -> anyhow::Result<GatewaySettings> {
    let mut settings = read_settings_file()?;

    apply_overrides(
        &mut settings,
        std::env::var("PAYMENT_MODE").ok().as_deref(),
        std::env::var("STRIPE_PRICE_ID").ok().as_deref(),
    )?;

    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid gateway settings: {}", e))?;

    Ok(settings)
}

fn read_settings_file() -> anyhow::Result<GatewaySettings> {
    let config_paths = [
        "config/gateway.toml",
        "../config/gateway.toml",
        "../../config/gateway.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let settings = GatewaySettings::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded gateway settings from {}", path);
            return Ok(settings);
        }
    }

    tracing::warn!("No gateway settings found, using defaults");
    Ok(GatewaySettings::default())
}

/// Apply `PAYMENT_MODE` / `STRIPE_PRICE_ID` style overrides
pub fn apply_overrides(
    settings: &mut GatewaySettings,
    payment_mode: Option<&str>,
    price_id: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(mode) = payment_mode.filter(|m| !m.trim().is_empty()) {
        settings.payment_mode = mode
            .parse()
            .map_err(|e| anyhow::anyhow!("PAYMENT_MODE: {}", e))?;
    }

    if let Some(price) = price_id.filter(|p| !p.trim().is_empty()) {
        settings.subscription.price_id = Some(price.trim().to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = AppConfig {
            host: "not a host".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut settings = GatewaySettings::default();

        apply_overrides(&mut settings, Some("subscription"), Some(" price_123 ")).unwrap();
        assert_eq!(settings.payment_mode, PaymentMode::Subscription);
        assert_eq!(settings.subscription.price_id.as_deref(), Some("price_123"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_apply_overrides_ignores_blank_and_rejects_unknown() {
        let mut settings = GatewaySettings::default();

        apply_overrides(&mut settings, Some(""), None).unwrap();
        assert_eq!(settings.payment_mode, PaymentMode::OneTime);

        assert!(apply_overrides(&mut settings, Some("weekly"), None).is_err());
    }
}
