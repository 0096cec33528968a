//! Budget agent. Turns an incoming A2A message into ledger updates and a reply.
//!
//! Every text part is handled on its own: a part that fails to parse gets a
//! hint line and never blocks or alters the others.

use crate::domain::{
    A2AMessage, Command, DomainError, MessageConfiguration, Money, ParseError, TaskResult,
    TransactionKind, UpdatedTotals, WeeklySummary, parse_command,
};
use crate::ports::{AgentPort, NotifierPort, TaskContext};
use crate::usecases::LedgerService;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";

pub const HELP_TEXT: &str = "I didn’t understand that. Try:\n\
- 'Add expense 500 groceries'\n\
- 'Add income 2000 salary'\n\
- 'Show summary'";

pub const EMPTY_WEEK_TEXT: &str = "No transactions recorded this week yet.";

/// Metadata keys checked, in order, for a stable sender identity.
const SENDER_KEYS: [&str; 3] = ["sender", "user", "from"];
const SENDER_ID_KEYS: [&str; 3] = ["id", "userId", "user_id"];

pub struct BudgetAgent {
    ledger: Arc<LedgerService>,
    notifier: Arc<dyn NotifierPort>,
    currency: String,
}

impl BudgetAgent {
    pub fn new(ledger: Arc<LedgerService>, notifier: Arc<dyn NotifierPort>) -> Self {
        Self {
            ledger,
            notifier,
            currency: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency = symbol.into();
        self
    }

    /// Handle one line of text. Store failures propagate; parse failures become hints.
    pub async fn handle_text(&self, user_id: &str, text: &str) -> Result<String, DomainError> {
        let command = match parse_command(text) {
            Ok(command) => command,
            Err(e) => {
                warn!(user_id, error = %e, "could not parse command");
                return Ok(amount_hint(&e));
            }
        };

        match command {
            Command::AddIncome { .. } | Command::AddExpense { .. } => {
                let totals = self.ledger.apply(user_id, &command).await?;
                Ok(self.added_text(&totals))
            }
            Command::ShowSummary => {
                let summary = self.ledger.summarize(user_id).await?;
                Ok(self.summary_text(&summary))
            }
            Command::Unrecognized => Ok(HELP_TEXT.to_string()),
        }
    }

    fn money(&self, amount: Money) -> String {
        format!("{}{}", self.currency, amount)
    }

    fn added_text(&self, totals: &UpdatedTotals) -> String {
        let tx = &totals.applied;
        let head = match tx.kind {
            TransactionKind::Expense => format!("🧾 Added expense of {}", self.money(tx.amount)),
            TransactionKind::Income => format!("💰 Added income of {}", self.money(tx.amount)),
        };
        match &tx.label {
            Some(label) => format!("{} for {}", head, label),
            None => head,
        }
    }

    fn summary_text(&self, summary: &WeeklySummary) -> String {
        if summary.is_empty() {
            return EMPTY_WEEK_TEXT.to_string();
        }
        format!(
            "📅 Weekly Summary → Income {}, Expenses {}, Balance {} 💪",
            self.money(summary.income),
            self.money(summary.expense),
            self.money(summary.net)
        )
    }
}

fn amount_hint(err: &ParseError) -> String {
    match err.kind() {
        TransactionKind::Expense => {
            "Could not detect amount. Try: 'Add expense 500 for gas'.".to_string()
        }
        TransactionKind::Income => {
            "Could not detect amount. Try: 'Add income 2000 salary'.".to_string()
        }
    }
}

/// Stable user id from message metadata (`sender`, `user` or `from`), falling
/// back to the conversation's context id.
pub fn resolve_user_id(message: &A2AMessage, context_id: &str) -> String {
    let Some(md) = message.metadata.as_ref().and_then(|m| m.as_object()) else {
        return context_id.to_string();
    };
    for key in SENDER_KEYS {
        let Some(candidate) = md.get(key) else {
            continue;
        };
        match candidate {
            serde_json::Value::Null => continue,
            serde_json::Value::Object(obj) => {
                let id = SENDER_ID_KEYS
                    .iter()
                    .filter_map(|k| obj.get(*k))
                    .find_map(value_as_id);
                if let Some(id) = id {
                    return id;
                }
            }
            other => {
                if let Some(id) = value_as_id(other) {
                    return id;
                }
            }
        }
    }
    context_id.to_string()
}

fn value_as_id(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl AgentPort for BudgetAgent {
    async fn process_messages(
        &self,
        messages: Vec<A2AMessage>,
        ctx: TaskContext,
        config: Option<MessageConfiguration>,
    ) -> Result<TaskResult, DomainError> {
        let message = messages
            .last()
            .ok_or_else(|| DomainError::InvalidRequest("No messages".to_string()))?;

        let context_id = ctx
            .context_id
            .or_else(|| message.context_id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let task_id = ctx
            .task_id
            .or_else(|| message.task_id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let user_id = resolve_user_id(message, &context_id);

        let texts: Vec<&str> = message.text_parts().collect();
        info!(
            user_id = %user_id,
            task_id = %task_id,
            parts = texts.len(),
            "processing message"
        );

        let mut lines = Vec::with_capacity(texts.len());
        for text in &texts {
            lines.push(self.handle_text(&user_id, text).await?);
        }
        let reply_text = if lines.is_empty() {
            HELP_TEXT.to_string()
        } else {
            lines.join("\n")
        };

        let reply = A2AMessage::agent_text(reply_text.trim(), &task_id, &context_id);
        let mut history = messages;
        if let Some(limit) = config.as_ref().and_then(|c| c.history_length) {
            let excess = history.len().saturating_sub(limit);
            history.drain(..excess);
        }
        let result = TaskResult::completed(task_id, context_id, reply, history);

        if let Some(target) = config.as_ref().and_then(MessageConfiguration::push_target) {
            self.notifier.notify(target, &result).await?;
            info!(task_id = %result.id, url = %target.url, "task pushed to webhook");
        }

        Ok(result)
    }
}
