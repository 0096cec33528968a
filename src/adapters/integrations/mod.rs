//! Outbound HTTP integrations.

pub mod webhook;

pub use webhook::{DEFAULT_WEBHOOK_TIMEOUT, WebhookNotifier};
