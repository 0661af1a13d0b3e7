//! # Payment Error Types
//!
//! Typed error handling for the stripe-gateway facade.
//! All provider operations return `Result<T, PaymentError>`.
//!
//! Errors fall into two tiers: local validation failures (the request never
//! reaches the provider) and provider/integration failures. Handlers only
//! look at the tier via [`PaymentError::status_code`].

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Amount missing, non-positive or not a finite number
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Currency not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError {
        provider: String,
        message: String,
        code: Option<String>,
    },

    /// Card was declined by the provider
    #[error("Payment declined: {reason}")]
    PaymentDeclined { reason: String },

    /// Rate limited by provider
    #[error("Rate limited by {provider}, retry after {retry_after_secs} seconds")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider returned a bare id where an expanded object was requested
    #[error("Field `{field}` was not expanded by the provider")]
    NotExpanded { field: String },

    /// Provider response is missing something the request needs
    #[error("Incomplete provider response: {0}")]
    IncompleteResponse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Returns true for local validation failures.
    ///
    /// These are raised before any provider call is made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidRequest(_)
                | PaymentError::InvalidAmount { .. }
                | PaymentError::UnsupportedCurrency { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        if self.is_validation() {
            400
        } else {
            500
        }
    }

    /// Shorthand for a field that came back as a bare reference
    pub fn not_expanded(field: impl Into<String>) -> Self {
        PaymentError::NotExpanded {
            field: field.into(),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
