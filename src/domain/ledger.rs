//! Weekly window arithmetic over a user's transactions.
//!
//! The week is a rolling window: a transaction counts iff its date is strictly
//! after `now - 7 days`.

use super::entities::{Transaction, TransactionKind, UserLedger, WeeklySummary};
use super::money::Money;
use chrono::{DateTime, Duration, Utc};

pub const WEEK_DAYS: i64 = 7;

/// First instant excluded from the window ending at `now`.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WEEK_DAYS)
}

impl UserLedger {
    /// Transactions inside the window ending at `now`.
    pub fn in_window(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Transaction> {
        let start = week_start(now);
        self.transactions.iter().filter(move |t| t.date > start)
    }

    /// Drop everything that has left the window. Returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let start = week_start(now);
        let before = self.transactions.len();
        self.transactions.retain(|t| t.date > start);
        before - self.transactions.len()
    }

    pub fn summarize(&self, now: DateTime<Utc>) -> WeeklySummary {
        let mut income = Money::zero();
        let mut expense = Money::zero();
        let mut count = 0;
        for t in self.in_window(now) {
            match t.kind {
                TransactionKind::Income => income += t.amount,
                TransactionKind::Expense => expense += t.amount,
            }
            count += 1;
        }
        WeeklySummary {
            income,
            expense,
            net: income - expense,
            transaction_count: count,
            week_start: week_start(now),
        }
    }
}
