//! A2A message model: the messages the agent receives, the task it returns,
//! and the push-notification settings a caller may attach.
//!
//! Field names follow the wire format (camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// One piece of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessagePart {
    Text {
        text: String,
    },
    Data {
        data: serde_json::Value,
    },
    File {
        file: serde_json::Value,
    },
    /// Any part kind this agent does not handle. Skipped during processing.
    #[serde(other)]
    Unknown,
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessagePart::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2AMessage {
    #[serde(default = "message_kind")]
    pub kind: String,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

fn message_kind() -> String {
    "message".to_string()
}

impl A2AMessage {
    /// Agent reply carrying a single text part.
    pub fn agent_text(text: impl Into<String>, task_id: &str, context_id: &str) -> Self {
        Self {
            kind: message_kind(),
            role: Role::Agent,
            parts: vec![MessagePart::text(text)],
            message_id: Some(uuid::Uuid::new_v4().to_string()),
            task_id: Some(task_id.to_string()),
            context_id: Some(context_id.to_string()),
            metadata: None,
        }
    }

    /// Text parts in order, skipping every other part kind.
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(MessagePart::as_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<A2AMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parts: Vec<MessagePart>,
}

/// The task object returned to the caller and pushed to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub history: Vec<A2AMessage>,
    #[serde(default = "task_kind")]
    pub kind: String,
}

fn task_kind() -> String {
    "task".to_string()
}

impl TaskResult {
    pub fn completed(
        task_id: String,
        context_id: String,
        reply: A2AMessage,
        mut history: Vec<A2AMessage>,
    ) -> Self {
        history.push(reply.clone());
        Self {
            id: task_id,
            context_id,
            status: TaskStatus {
                state: TaskState::Completed,
                timestamp: Utc::now(),
                message: Some(reply),
            },
            artifacts: Vec::new(),
            history,
            kind: task_kind(),
        }
    }

    /// Text of the status message, if any.
    pub fn reply_text(&self) -> Option<&str> {
        self.status
            .message
            .as_ref()
            .and_then(|m| m.text_parts().next())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushAuthentication {
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Where and how to push the finished task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotificationConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<PushAuthentication>,
}

impl PushNotificationConfig {
    /// Bearer token: top-level `token`, then `authentication.credentials`,
    /// then `authentication.token`. Blank values are ignored.
    pub fn bearer_token(&self) -> Option<&str> {
        let auth = self.authentication.as_ref();
        self.token
            .as_deref()
            .into_iter()
            .chain(auth.and_then(|a| a.credentials.as_deref()))
            .chain(auth.and_then(|a| a.token.as_deref()))
            .find(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageConfiguration {
    #[serde(default)]
    pub accepted_output_modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notification_config: Option<PushNotificationConfig>,
    #[serde(default = "default_blocking")]
    pub blocking: bool,
}

fn default_blocking() -> bool {
    true
}

impl MessageConfiguration {
    /// Push target, if one with a non-empty URL was supplied.
    pub fn push_target(&self) -> Option<&PushNotificationConfig> {
        self.push_notification_config
            .as_ref()
            .filter(|p| !p.url.trim().is_empty())
    }
}
