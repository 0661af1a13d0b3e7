//! # Customer Types
//!
//! Provider-side customer objects and the local email → customer cache.
//!
//! The cache is best-effort. It is never consulted as a source of truth:
//! handlers always re-query the provider, and only record what they saw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A customer object as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID (cus_...)
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Parameters for creating a provider customer
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub email: String,
    pub name: Option<String>,
    /// Payment method to attach; also set as the invoice default
    pub payment_method_id: String,
}

impl NewCustomer {
    pub fn new(email: impl Into<String>, payment_method_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            payment_method_id: payment_method_id.into(),
        }
    }

    /// Builder: set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Cached mapping of an email to the provider customer and its card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub email: String,
    pub customer_id: String,
    pub payment_method_id: String,
    pub cached_at: DateTime<Utc>,
}

impl CustomerRecord {
    pub fn new(
        email: impl Into<String>,
        customer_id: impl Into<String>,
        payment_method_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            customer_id: customer_id.into(),
            payment_method_id: payment_method_id.into(),
            cached_at: Utc::now(),
        }
    }
}

/// Key-value store for customer records, keyed by email.
///
/// Implementations must be safe to share across request tasks.
/// Concurrent `put`s for the same email resolve as last-write-wins.
pub trait CustomerStore: Send + Sync {
    fn get(&self, email: &str) -> Option<CustomerRecord>;

    /// Insert or replace, returning the previous record
    fn put(&self, record: CustomerRecord) -> Option<CustomerRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type alias for a shared customer store (dynamic dispatch)
pub type SharedCustomerStore = Arc<dyn CustomerStore>;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    records: RwLock<HashMap<String, CustomerRecord>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create wrapped for sharing through app state
    pub fn shared() -> SharedCustomerStore {
        Arc::new(Self::new())
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn get(&self, email: &str) -> Option<CustomerRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.get(email).cloned()
    }

    fn put(&self, record: CustomerRecord) -> Option<CustomerRecord> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(record.email.clone(), record)
    }

    fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
