//! Push-notification outbound port. Deliver finished tasks to a caller's webhook.

use crate::domain::{DomainError, PushNotificationConfig, TaskResult};

/// Port for notifying an external URL that a task finished.
///
/// Implemented by adapters (e.g. the reqwest webhook client).
#[async_trait::async_trait]
pub trait NotifierPort: Send + Sync {
    /// POST `task` to `target.url`.
    ///
    /// # Errors
    /// Returns `DomainError::Webhook` if the target is unreachable or answers
    /// with a non-success status.
    async fn notify(
        &self,
        target: &PushNotificationConfig,
        task: &TaskResult,
    ) -> Result<(), DomainError>;
}
