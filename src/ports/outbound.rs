//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::DomainError;
use std::time::Duration;

/// Key-value session store. Values are opaque strings (JSON in practice).
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value. Expired or missing keys return `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a value, replacing any previous one. `ttl` of `None` never expires.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), DomainError>;

    /// Cheap reachability check used at startup.
    async fn ping(&self) -> Result<(), DomainError>;
}
