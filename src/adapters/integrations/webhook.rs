//! Webhook adapter. Implements NotifierPort by POSTing the task JSON to the
//! caller-supplied push URL.

use crate::domain::{DomainError, PushNotificationConfig, TaskResult};
use crate::ports::NotifierPort;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Push-notification client. One reqwest client reused for every delivery.
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Create a notifier whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("webhook client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl NotifierPort for WebhookNotifier {
    async fn notify(
        &self,
        target: &PushNotificationConfig,
        task: &TaskResult,
    ) -> Result<(), DomainError> {
        let mut req = self.client.post(&target.url).json(task);
        if let Some(token) = target.bearer_token() {
            req = req.bearer_auth(token);
        }

        let res = req.send().await.map_err(|e| {
            warn!(url = %target.url, error = %e, "webhook push failed");
            DomainError::Webhook(format!("Request failed: {}", e))
        })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            warn!(url = %target.url, %status, "webhook rejected push");
            return Err(DomainError::Webhook(format!(
                "Webhook returned {}: {}",
                status, text
            )));
        }

        debug!(url = %target.url, task_id = %task.id, "webhook push delivered");
        Ok(())
    }
}
