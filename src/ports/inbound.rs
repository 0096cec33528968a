//! Inbound port. The HTTP adapter calls into the application.

use crate::domain::{A2AMessage, DomainError, MessageConfiguration, TaskResult};

/// Ids a caller may pin for the task it is submitting.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    pub context_id: Option<String>,
    pub task_id: Option<String>,
}

/// Agent port: process incoming A2A messages into a finished task.
#[async_trait::async_trait]
pub trait AgentPort: Send + Sync {
    /// Process the last of `messages` and return the completed task.
    async fn process_messages(
        &self,
        messages: Vec<A2AMessage>,
        ctx: TaskContext,
        config: Option<MessageConfiguration>,
    ) -> Result<TaskResult, DomainError>;
}
