//! Session ledger: per-user transactions behind the key-value store.
//!
//! - One JSON value per user under `budget:user:{id}`
//! - Read-modify-write is serialized per user with an async mutex
//! - Every write prunes transactions outside the week window and refreshes the TTL

use crate::domain::{
    Command, DomainError, Transaction, UpdatedTotals, UserLedger, WeeklySummary,
};
use crate::ports::KeyValueStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, info};

/// Default TTL for a session key: one week since the last write.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

type UserLock = tokio::sync::Mutex<()>;

pub struct LedgerService {
    store: Arc<dyn KeyValueStore>,
    session_ttl: Duration,
    locks: Mutex<HashMap<String, Weak<UserLock>>>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn KeyValueStore>, session_ttl: Duration) -> Self {
        Self {
            store,
            session_ttl,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn key(user_id: &str) -> String {
        format!("budget:user:{}", user_id)
    }

    /// Lock shared by every in-flight request for `user_id`.
    /// Entries whose requests have all finished are dropped on the next lookup.
    fn user_lock(&self, user_id: &str) -> Arc<UserLock> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(user_id).and_then(Weak::upgrade) {
            return lock;
        }
        locks.retain(|_, w| w.strong_count() > 0);
        let lock = Arc::new(UserLock::new(()));
        locks.insert(user_id.to_string(), Arc::downgrade(&lock));
        lock
    }

    pub async fn load(&self, user_id: &str) -> Result<UserLedger, DomainError> {
        match self.store.get(&Self::key(user_id)).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| DomainError::Codec(e.to_string())),
            None => Ok(UserLedger::default()),
        }
    }

    async fn save(&self, user_id: &str, ledger: &UserLedger) -> Result<(), DomainError> {
        let raw = serde_json::to_string(ledger).map_err(|e| DomainError::Codec(e.to_string()))?;
        self.store
            .set(&Self::key(user_id), &raw, Some(self.session_ttl))
            .await
    }

    /// Record an add-income / add-expense command for `user_id`.
    pub async fn apply(
        &self,
        user_id: &str,
        command: &Command,
    ) -> Result<UpdatedTotals, DomainError> {
        self.apply_at(user_id, command, Utc::now()).await
    }

    pub async fn apply_at(
        &self,
        user_id: &str,
        command: &Command,
        now: DateTime<Utc>,
    ) -> Result<UpdatedTotals, DomainError> {
        let (kind, amount, label) = command.as_transaction().ok_or_else(|| {
            DomainError::InvalidRequest(format!("{:?} does not record a transaction", command))
        })?;
        let tx = Transaction {
            kind,
            amount,
            label: label.map(str::to_string),
            date: now,
        };

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut ledger = self.load(user_id).await?;
        let pruned = ledger.prune(now);
        if pruned > 0 {
            debug!(user_id, pruned, "dropped transactions outside the week window");
        }
        ledger.transactions.push(tx.clone());
        self.save(user_id, &ledger).await?;

        let summary = ledger.summarize(now);
        info!(
            user_id,
            kind = kind.as_str(),
            %amount,
            income = %summary.income,
            expense = %summary.expense,
            "transaction recorded"
        );
        Ok(UpdatedTotals {
            applied: tx,
            income: summary.income,
            expense: summary.expense,
        })
    }

    /// Totals over the last seven days for `user_id`.
    pub async fn summarize(&self, user_id: &str) -> Result<WeeklySummary, DomainError> {
        self.summarize_at(user_id, Utc::now()).await
    }

    pub async fn summarize_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<WeeklySummary, DomainError> {
        Ok(self.load(user_id).await?.summarize(now))
    }
}
