//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/storage types here — these are mapped from adapters.

use super::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// A single recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub date: DateTime<Utc>,
}

/// Everything stored for one user. Serialized as the value of `budget:user:{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLedger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Totals over the current week window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub income: Money,
    pub expense: Money,
    pub net: Money,
    pub transaction_count: usize,
    pub week_start: DateTime<Utc>,
}

impl WeeklySummary {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

/// Result of applying one add-income / add-expense operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatedTotals {
    pub applied: Transaction,
    pub income: Money,
    pub expense: Money,
}
